//! Session parameters - network operation control.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deadline applied to comparisons, follow-ups and assessments
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Parameters shared by every network operation of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Deadline after which an in-flight request is cancelled.
    pub request_timeout: Duration,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SessionParams {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build from a timeout in seconds; zero falls back to the default.
    pub fn from_timeout_seconds(seconds: u64) -> Self {
        if seconds == 0 {
            Self::default()
        } else {
            Self::default().with_request_timeout(Duration::from_secs(seconds))
        }
    }
}
