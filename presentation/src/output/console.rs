//! Console output formatter for comparison sessions

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use stack_domain::{
    AgentCatalog, AgentTier, AssessmentResult, Session, SessionError, Turn, TurnStatus,
};

/// Formats session snapshots for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Strip ANSI styling from everything this process prints
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Format the complete session
    pub fn format(session: &Session) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Intern Stack Comparison"));
        output.push('\n');

        let (name1, name2) = Self::agent_names(session);
        output.push_str(&format!(
            "{} {} vs {}\n",
            "Agents:".cyan().bold(),
            name1,
            name2
        ));

        for turn in session.turns() {
            let title = if turn.index() == 0 {
                "Comparison".to_string()
            } else {
                format!("Follow-up {}", turn.index())
            };
            output.push_str(&Self::section_header(&title));
            output.push_str(&Self::format_turn(turn, &name1, &name2));
            if let Some(assessment) = session.assessment(turn.index()) {
                output.push_str(&Self::format_assessment(assessment));
            }
        }

        if let Some(error) = session.error() {
            output.push('\n');
            output.push_str(&Self::format_error(error));
            output.push('\n');
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(session: &Session) -> String {
        serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the latest turn only (concise output)
    pub fn format_answers(session: &Session) -> String {
        let Some(turn) = session.turns().last() else {
            return format!("{}\n", "No comparison yet.".dimmed());
        };
        let (name1, name2) = Self::agent_names(session);
        let mut output = Self::format_turn(turn, &name1, &name2);
        if let Some(assessment) = session.assessment(turn.index()) {
            output.push_str(&Self::format_assessment(assessment));
        }
        output
    }

    /// One turn: question, both answers or its failure
    pub fn format_turn(turn: &Turn, name1: &str, name2: &str) -> String {
        let mut output = format!("\n{} {}\n", "Q:".bold(), turn.question());
        match (turn.status(), turn.responses()) {
            (TurnStatus::Completed, Some((answer1, answer2))) => {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", name1).yellow().bold(),
                    answer1
                ));
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", name2).yellow().bold(),
                    answer2
                ));
            }
            (TurnStatus::Pending, _) => {
                output.push_str(&format!("{}\n", "Waiting for both agents...".dimmed()));
            }
            (status, _) => {
                output.push_str(&format!(
                    "{} {}\n",
                    format!("[{}]", status).red().bold(),
                    turn.failure().unwrap_or("Unknown")
                ));
            }
        }
        output
    }

    /// Both critiques for one turn
    pub fn format_assessment(result: &AssessmentResult) -> String {
        let info = &result.assessor_info;
        format!(
            "\n{}\n{}\n{}\n\n{}\n{}\n",
            "Cross-assessment".cyan().bold(),
            format!("{} on {}:", info.agent2_name, info.agent1_name).green(),
            Self::indent(&result.agent1_assessment_by_agent2, "  "),
            format!("{} on {}:", info.agent1_name, info.agent2_name).green(),
            Self::indent(&result.agent2_assessment_by_agent1, "  "),
        )
    }

    pub fn format_error(error: &SessionError) -> String {
        format!("{} {}", format!("Error ({}):", error.kind).red().bold(), error.message)
    }

    /// Agents grouped by tier, followed by the best-practice phrases
    pub fn format_catalog(catalog: &AgentCatalog) -> String {
        let mut output = String::new();
        for (tier, title) in [(AgentTier::Free, "Free agents"), (AgentTier::Premium, "Premium agents")] {
            output.push_str(&format!("{}\n", title.cyan().bold()));
            for agent in catalog.by_tier(tier) {
                let line = if agent.domains.is_empty() {
                    format!("  {:<20} {}", agent.id, agent.name)
                } else {
                    format!(
                        "  {:<20} {} ({})",
                        agent.id,
                        agent.name,
                        agent.domains.join(", ")
                    )
                };
                if agent.enabled {
                    output.push_str(&line);
                } else {
                    output.push_str(&format!("{} {}", line.dimmed(), "[disabled]".dimmed()));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !catalog.best_practices().is_empty() {
            output.push_str(&format!("{}\n", "Best practices".cyan().bold()));
            for phrase in catalog.best_practices() {
                output.push_str(&format!("  * {}\n", phrase));
            }
        }
        output
    }

    fn agent_names(session: &Session) -> (String, String) {
        match session.pair() {
            Some(pair) => (pair.agent1_name.clone(), pair.agent2_name.clone()),
            None => ("Agent 1".to_string(), "Agent 2".to_string()),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, session: &Session) -> String {
        Self::format(session)
    }

    fn format_json(&self, session: &Session) -> String {
        Self::format_json(session)
    }

    fn format_answers(&self, session: &Session) -> String {
        Self::format_answers(session)
    }
}
