//! Agent domain.
//!
//! - [`entities::Agent`] - a selectable agent from the backend catalog
//! - [`entities::AgentPair`] - the two agents being compared
//! - [`catalog::AgentCatalog`] - agents plus best-practice phrases

pub mod catalog;
pub mod entities;
