//! Output formatter trait

use stack_domain::{OutputFormat, Session};

/// Trait for formatting session snapshots
pub trait OutputFormatter {
    /// Every turn with its assessments
    fn format(&self, session: &Session) -> String;

    /// Format as JSON
    fn format_json(&self, session: &Session) -> String;

    /// Only the latest pair of answers (concise output)
    fn format_answers(&self, session: &Session) -> String;

    /// Format in the requested style
    fn render(&self, session: &Session, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(session),
            OutputFormat::Answers => self.format_answers(session),
            OutputFormat::Json => self.format_json(session),
        }
    }
}
