//! Output format value object

use serde::{Deserialize, Serialize};

/// How a session is rendered on the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every turn with its assessments
    Full,
    /// Only the latest pair of answers (default)
    #[default]
    Answers,
    /// JSON snapshot of the session
    Json,
}

impl OutputFormat {
    pub const VARIANTS: [&'static str; 3] = ["full", "answers", "json"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "answers" => Some(Self::Answers),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}
