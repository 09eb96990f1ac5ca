//! HTTP adapter for the comparison API
//!
//! Implements [`ComparisonBackend`](stack_application::ComparisonBackend)
//! with reqwest.

mod backend;
pub mod error;
mod protocol;

pub use backend::HttpBackend;
pub use error::HttpBackendError;
