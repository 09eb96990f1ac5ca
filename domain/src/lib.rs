//! Domain layer for intern-stack
//!
//! This crate contains the session state machine, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A session compares two agents on one question (turn 0) and may continue
//! with follow-up questions (turns 1..n) that carry the conversation so far.
//! Each completed turn can be cross-assessed: every agent critiques the
//! other's answer along the selected criteria.
//!
//! ## Single-flight
//!
//! Comparisons, follow-ups and assessments each have a busy flag. A second
//! request of the same class while one is in flight is rejected, not queued.

pub mod agent;
pub mod config;
pub mod core;
pub mod session;

// Re-export commonly used types
pub use agent::{
    catalog::AgentCatalog,
    entities::{Agent, AgentPair, AgentSlot, AgentTier},
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::{DomainError, ErrorKind, SessionError, ValidationError},
    question::Question,
};
pub use session::{
    assessment::{ASSESSMENT_CRITERIA, AssessmentResult, AssessorInfo},
    busy::{BusyFlags, OperationKind},
    entities::{ComparisonRequest, Session},
    history::{ConversationEntry, ConversationHistory},
    intent::{Intent, transition},
    ticket::{AssessmentTicket, TurnTicket},
    turn::{AgentAnswer, Turn, TurnStatus},
};
