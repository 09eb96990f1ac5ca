//! Turn entity and its status state machine
//!
//! ```text
//! Pending ──> Completed
//!        ├──> Failed
//!        └──> TimedOut
//! ```
//!
//! All three outcomes are terminal. A failed turn is retried by replacing
//! it with a fresh `Pending` turn at the same index, never by mutating it.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Pending,
    Completed,
    Failed,
    TimedOut,
}

impl TurnStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnStatus::Pending)
    }

    /// Failed or timed out: asked, but no answer.
    pub fn is_failure(&self) -> bool {
        matches!(self, TurnStatus::Failed | TurnStatus::TimedOut)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnStatus::Pending => "pending",
            TurnStatus::Completed => "completed",
            TurnStatus::Failed => "failed",
            TurnStatus::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One agent's answer as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAnswer {
    pub name: String,
    pub response: String,
}

impl AgentAnswer {
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: response.into(),
        }
    }
}

/// One round of paired agent responses (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    index: usize,
    question: String,
    agent1_response: Option<String>,
    agent2_response: Option<String>,
    status: TurnStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
}

impl Turn {
    pub fn pending(index: usize, question: impl Into<String>) -> Self {
        Self {
            index,
            question: question.into(),
            agent1_response: None,
            agent2_response: None,
            status: TurnStatus::Pending,
            failure: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn agent1_response(&self) -> Option<&str> {
        self.agent1_response.as_deref()
    }

    pub fn agent2_response(&self) -> Option<&str> {
        self.agent2_response.as_deref()
    }

    pub fn status(&self) -> TurnStatus {
        self.status
    }

    /// Message of the error that ended this turn, if it failed
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TurnStatus::Completed
    }

    /// Both responses, present only once completed
    pub fn responses(&self) -> Option<(&str, &str)> {
        match (&self.agent1_response, &self.agent2_response) {
            (Some(a1), Some(a2)) if self.is_completed() => Some((a1, a2)),
            _ => None,
        }
    }

    pub(crate) fn complete(
        &mut self,
        agent1_response: impl Into<String>,
        agent2_response: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.agent1_response = Some(agent1_response.into());
        self.agent2_response = Some(agent2_response.into());
        self.status = TurnStatus::Completed;
        Ok(())
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = TurnStatus::Failed;
        self.failure = Some(message.into());
        Ok(())
    }

    pub(crate) fn time_out(&mut self, message: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = TurnStatus::TimedOut;
        self.failure = Some(message.into());
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                index: self.index,
                from: self.status,
            });
        }
        Ok(())
    }
}
