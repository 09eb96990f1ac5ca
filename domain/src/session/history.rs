//! Conversation history accumulator

use serde::{Deserialize, Serialize};

/// One completed exchange, sent back verbatim as follow-up context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub question: String,
    pub agent1_response: String,
    pub agent2_response: String,
}

impl ConversationEntry {
    pub fn new(
        question: impl Into<String>,
        agent1_response: impl Into<String>,
        agent2_response: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            agent1_response: agent1_response.into(),
            agent2_response: agent2_response.into(),
        }
    }
}

/// Append-only log of completed turns, in turn order.
///
/// Entries are never reordered or truncated; the whole log is only
/// dropped when a fresh comparison resets the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    entries: Vec<ConversationEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
