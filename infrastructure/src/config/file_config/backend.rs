//! Backend configuration from TOML (`[backend]` section)

use serde::{Deserialize, Serialize};
use stack_domain::{ConfigIssue, ConfigIssueCode, Severity};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Raw backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the comparison API (without trailing slash)
    pub base_url: String,
    /// Deadline for every network operation, in seconds
    pub timeout_secs: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FileBackendConfig {
    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::EmptyValue {
                    field: "backend.base_url".to_string(),
                },
                message: "backend.base_url cannot be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::OutOfRange {
                    field: "backend.timeout_secs".to_string(),
                    value: "0".to_string(),
                },
                message: "backend.timeout_secs must be greater than 0".to_string(),
            });
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_is_an_error() {
        let config = FileBackendConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }
}
