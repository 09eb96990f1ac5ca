//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every compare, follow-up and assessment
    pub conversation_log: Option<String>,
    /// Directory for daily-rolling diagnostic log files
    pub file_dir: Option<String>,
}
