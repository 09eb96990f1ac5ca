//! Tickets handed to the network layer when an operation is admitted.
//!
//! A ticket carries everything the outgoing request needs plus the session
//! generation it was issued in, so a late reply from a session that has
//! since been reset can be recognised and dropped.

use super::busy::OperationKind;
use super::history::ConversationEntry;
use crate::core::question::Question;

/// An admitted comparison (index 0) or follow-up (index >= 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTicket {
    pub generation: u64,
    pub index: usize,
    pub agent1_id: String,
    pub agent2_id: String,
    pub question: Question,
    pub best_practices: Vec<String>,
    pub conversation_history: Vec<ConversationEntry>,
}

impl TurnTicket {
    pub fn kind(&self) -> OperationKind {
        if self.index == 0 {
            OperationKind::Compare
        } else {
            OperationKind::FollowUp
        }
    }
}

/// An admitted assessment request for one completed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentTicket {
    pub generation: u64,
    pub turn_index: usize,
    pub agent1_id: String,
    pub agent2_id: String,
    pub question: String,
    pub agent1_response: String,
    pub agent2_response: String,
    pub criteria: Vec<String>,
}
