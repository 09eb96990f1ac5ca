//! Application-level configuration.
//!
//! - [`SessionParams`] - deadlines for network operations

pub mod session_params;

pub use session_params::{DEFAULT_REQUEST_TIMEOUT, SessionParams};
