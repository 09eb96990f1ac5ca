//! Infrastructure layer for intern-stack
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileBackendConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileReplConfig,
};
pub use http::{HttpBackend, HttpBackendError};
pub use logging::JsonlConversationLogger;
