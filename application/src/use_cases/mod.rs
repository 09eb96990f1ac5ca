//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assessment_manager;
pub mod load_catalog;
pub mod session_store;
pub(crate) mod shared;
#[cfg(test)]
pub(crate) mod test_support;
pub mod turn_orchestrator;
