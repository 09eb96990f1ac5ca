//! Primitive intents raised by the rendering layer

use super::entities::Session;
use crate::agent::entities::AgentSlot;
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A field-level change requested by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Intent {
    /// Choose (or clear, with `None`) the agent for a slot
    SelectAgent {
        slot: AgentSlot,
        agent_id: Option<String>,
    },
    TogglePractice(String),
    ToggleCriterion(String),
    EditQuestion(String),
    EditFollowUp {
        index: usize,
        text: String,
    },
    /// Dismiss the current error; never resubmits anything
    Retry,
}

/// Pure transition `(Session, Intent) -> Session'`.
///
/// The input session is left untouched, which makes intent sequences
/// replayable in tests.
pub fn transition(session: &Session, intent: Intent) -> Result<Session, ValidationError> {
    let mut next = session.clone();
    next.apply(intent)?;
    Ok(next)
}
