//! Error types for the HTTP backend adapter

use thiserror::Error;

/// Errors raised while constructing the HTTP backend
#[derive(Error, Debug)]
pub enum HttpBackendError {
    #[error("Invalid backend base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
