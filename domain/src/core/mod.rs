//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`] - a validated, non-blank question
//! - [`error::ValidationError`] - precondition violations
//! - [`error::SessionError`] - the error surfaced on the session

pub mod error;
pub mod question;
