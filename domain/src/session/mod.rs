//! Comparison session domain.
//!
//! - [`entities::Session`] - the aggregate holding all session state
//! - [`turn::Turn`] - one question answered by both agents
//! - [`history::ConversationHistory`] - context log for follow-ups
//! - [`assessment::AssessmentResult`] - cross-assessment of a turn
//! - [`intent::Intent`] - field-level changes from the rendering layer

pub mod assessment;
pub mod busy;
pub mod entities;
pub mod history;
pub mod intent;
pub mod ticket;
pub mod turn;
