//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod backend;
mod logging;
mod output;
mod repl;

pub use backend::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, FileBackendConfig};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;

use serde::{Deserialize, Serialize};
use stack_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Comparison API settings
    pub backend: FileBackendConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Log file settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.backend.validate();
        issues.extend(self.output.parse_format().1);
        issues
    }
}
