//! Question value object

use serde::{Deserialize, Serialize};

/// A question put to both agents (Value Object)
///
/// Content is stored trimmed; a question is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question {
    content: String,
}

impl Question {
    /// Try to create a new question, returning None if blank
    pub fn try_new(content: impl AsRef<str>) -> Option<Self> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                content: trimmed.to_string(),
            })
        }
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
