//! Presentation-level configuration
//!
//! Settings for the interactive chat mode, resolved by the binary from
//! the config file and command line.

use stack_domain::OutputFormat;
use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// How each answer is printed
    pub format: OutputFormat,
    /// Path to history file; `None` uses the platform data directory
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Answers,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// The history file to use, if any location is available
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("intern-stack").join("history.txt")))
    }
}
