//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use stack_domain::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format: "full", "answers" or "json"
    pub format: Option<String>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Parse `format`, reporting unknown values and falling back to the default.
    pub fn parse_format(&self) -> (OutputFormat, Vec<ConfigIssue>) {
        let Some(raw) = self.format.as_deref() else {
            return (OutputFormat::default(), vec![]);
        };
        match OutputFormat::parse(raw) {
            Some(format) => (format, vec![]),
            None => (
                OutputFormat::default(),
                vec![ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "output.format".to_string(),
                        value: raw.to_string(),
                        valid_values: OutputFormat::VARIANTS.iter().map(|v| v.to_string()).collect(),
                    },
                    message: format!(
                        "output.format: unknown value '{}', falling back to 'answers'",
                        raw
                    ),
                }],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.parse_format().0, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_format_warns() {
        let config = FileOutputConfig {
            format: Some("synthesis".to_string()),
            color: true,
        };
        let (format, issues) = config.parse_format();
        assert_eq!(format, OutputFormat::Answers);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
