//! Domain error types

use crate::session::busy::OperationKind;
use crate::session::turn::TurnStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Precondition violations detected before any network call.
///
/// The `Display` text doubles as the user-facing message stored in the
/// session error field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select two agents and enter a question.")]
    MissingInput,

    #[error("Please select two different agents.")]
    DuplicateAgents,

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Agent {0} is not enabled")]
    AgentDisabled(String),

    #[error("Enter a follow-up question.")]
    BlankFollowUp,

    #[error("Select at least one assessment criterion.")]
    EmptyCriteria,

    #[error("Run a comparison before asking follow-up questions.")]
    NoComparison,

    #[error("Turn 0 is the initial comparison; start a new comparison instead.")]
    InitialTurn,

    #[error("Turn {0} does not exist.")]
    TurnNotFound(usize),

    #[error("Turn {0} has not completed yet.")]
    TurnNotCompleted(usize),

    #[error("Follow-up {index} cannot be asked before turn {previous} completes.")]
    OutOfOrder { index: usize, previous: usize },

    #[error("Follow-up {index} skips ahead; the next follow-up is {next}.")]
    IndexGap { index: usize, next: usize },

    #[error("Turn {0} has already been answered.")]
    AlreadyAnswered(usize),

    #[error("Another {0} is already in progress.")]
    Busy(OperationKind),
}

/// Domain-level errors that are not user input problems
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Turn {index} cannot leave the {from} state")]
    InvalidTransition { index: usize, from: TurnStatus },

    #[error("Reply belongs to session generation {ticket}, current is {current}")]
    StaleTicket { ticket: u64, current: u64 },
}

/// Category of the error currently shown for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Network,
    Timeout,
    Backend,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Backend => "backend",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single session-level error surfaced to the rendering layer
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SessionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "Operation cancelled")
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}

impl From<&ValidationError> for SessionError {
    fn from(err: &ValidationError) -> Self {
        Self::new(ErrorKind::Validation, err.to_string())
    }
}
