//! Shared utilities for use cases.
//!
//! Contains the deadline-and-cancellation wrapper every backend call goes
//! through, and the mapping from call failures to the session error shown
//! to the user.

use crate::ports::backend::GatewayError;
use stack_domain::{DomainError, ErrorKind, OperationKind, SessionError, ValidationError};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Errors returned by the session use cases
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionOpError {
    /// Rejected before any network call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend call failed; the same error is in the session error field
    #[error(transparent)]
    Failed(SessionError),

    /// The reply could not be recorded (e.g. the session was reset meanwhile)
    #[error("Reply discarded: {0}")]
    State(#[from] DomainError),
}

impl SessionOpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionOpError::Validation(_) | SessionOpError::State(_) => ErrorKind::Validation,
            SessionOpError::Failed(e) => e.kind,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}

/// Why a deadline-bounded call did not produce a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CallError {
    Gateway(GatewayError),
    Timeout,
    Cancelled,
}

/// Await `call` until it resolves, `deadline` elapses, or `token` fires.
///
/// On expiry or cancellation the call future is dropped, which aborts the
/// underlying request.
pub(crate) async fn call_with_deadline<T, F>(
    call: F,
    deadline: Duration,
    token: &CancellationToken,
) -> Result<T, CallError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CallError::Cancelled),
        result = tokio::time::timeout(deadline, call) => match result {
            Ok(reply) => reply.map_err(CallError::Gateway),
            Err(_) => Err(CallError::Timeout),
        },
    }
}

/// Turn a call failure into the message shown for an operation of `kind`.
pub(crate) fn describe(kind: OperationKind, err: CallError) -> SessionError {
    match err {
        CallError::Timeout | CallError::Gateway(GatewayError::Timeout) => {
            SessionError::timeout(timeout_message(kind))
        }
        CallError::Cancelled => SessionError::cancelled(),
        CallError::Gateway(GatewayError::ConnectionError(detail)) => {
            SessionError::network(format!("{} ({detail})", network_message(kind)))
        }
        CallError::Gateway(GatewayError::Backend(message)) if !message.trim().is_empty() => {
            SessionError::backend(message)
        }
        CallError::Gateway(GatewayError::Backend(_)) => SessionError::backend(fallback_message(kind)),
        CallError::Gateway(GatewayError::InvalidResponse(detail)) => {
            warn!("Unreadable {} reply: {}", kind, detail);
            SessionError::backend(fallback_message(kind))
        }
    }
}

fn timeout_message(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Compare => {
            "Request timed out. AI responses are taking longer than expected. Please try again."
        }
        OperationKind::FollowUp => "Follow-up request timed out. Please try again.",
        OperationKind::Assess => "Assessment request timed out. Please try again.",
    }
}

fn network_message(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Compare => {
            "Failed to compare agents. Please check your connection and try again."
        }
        OperationKind::FollowUp => "Failed to process follow-up. Please try again.",
        OperationKind::Assess => "Failed to get assessment. Please try again.",
    }
}

fn fallback_message(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Compare => "An error occurred during comparison.",
        OperationKind::FollowUp => "An error occurred during follow-up comparison.",
        OperationKind::Assess => "Failed to get assessment",
    }
}
