//! Slash command parsing for the chat REPL

use stack_domain::{AgentSlot, OutputFormat};

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReplCommand {
    Quit,
    Help,
    /// List the agent catalog
    Agents,
    /// Select (or clear) the agent of a slot
    Select {
        slot: AgentSlot,
        agent_id: Option<String>,
    },
    /// Toggle a best practice by number or text; no argument lists them
    Practice(Option<String>),
    /// Toggle an assessment criterion by number or text; no argument lists them
    Criterion(Option<String>),
    /// Start a fresh comparison, optionally with a new question
    New(Option<String>),
    /// Assess a turn (defaults to the latest answered one)
    Assess(Option<usize>),
    Retry,
    Show(OutputFormat),
    /// Plain text: a comparison question or the next follow-up
    Ask(String),
    Invalid(String),
}

impl ReplCommand {
    pub(crate) fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Ask(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, non_empty(arg)),
            None => (rest, None),
        };

        match name {
            "quit" | "exit" | "q" => ReplCommand::Quit,
            "help" | "h" | "?" => ReplCommand::Help,
            "agents" => ReplCommand::Agents,
            "agent1" | "a" => ReplCommand::Select {
                slot: AgentSlot::First,
                agent_id: arg,
            },
            "agent2" | "b" => ReplCommand::Select {
                slot: AgentSlot::Second,
                agent_id: arg,
            },
            "practice" | "p" => ReplCommand::Practice(arg),
            "criterion" | "c" => ReplCommand::Criterion(arg),
            "new" => ReplCommand::New(arg),
            "assess" => match arg.as_deref().map(str::parse::<usize>) {
                None => ReplCommand::Assess(None),
                Some(Ok(index)) => ReplCommand::Assess(Some(index)),
                Some(Err(_)) => ReplCommand::Invalid(format!("Not a turn number: {}", rest)),
            },
            "retry" => ReplCommand::Retry,
            "show" => ReplCommand::Show(OutputFormat::Full),
            "json" => ReplCommand::Show(OutputFormat::Json),
            _ => ReplCommand::Invalid(format!("Unknown command: /{}", name)),
        }
    }
}

/// Resolve a 1-based option number to its text; anything else is taken verbatim.
pub(crate) fn resolve_choice(arg: &str, options: &[String]) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i))
        .cloned()
        .unwrap_or_else(|| arg.to_string())
}

fn non_empty(arg: &str) -> Option<String> {
    let arg = arg.trim();
    (!arg.is_empty()).then(|| arg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            ReplCommand::parse("  What is 2+2? "),
            ReplCommand::Ask("What is 2+2?".to_string())
        );
    }

    #[test]
    fn test_agent_selection() {
        assert_eq!(
            ReplCommand::parse("/agent1 gpt-4"),
            ReplCommand::Select {
                slot: AgentSlot::First,
                agent_id: Some("gpt-4".to_string())
            }
        );
        assert_eq!(
            ReplCommand::parse("/b"),
            ReplCommand::Select {
                slot: AgentSlot::Second,
                agent_id: None
            }
        );
    }

    #[test]
    fn test_arguments_keep_inner_spaces() {
        assert_eq!(
            ReplCommand::parse("/criterion Technical depth"),
            ReplCommand::Criterion(Some("Technical depth".to_string()))
        );
        assert_eq!(
            ReplCommand::parse("/new   Why is the sky blue?"),
            ReplCommand::New(Some("Why is the sky blue?".to_string()))
        );
    }

    #[test]
    fn test_assess_turn_number() {
        assert_eq!(ReplCommand::parse("/assess"), ReplCommand::Assess(None));
        assert_eq!(ReplCommand::parse("/assess 2"), ReplCommand::Assess(Some(2)));
        assert!(matches!(
            ReplCommand::parse("/assess two"),
            ReplCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            ReplCommand::parse("/frobnicate"),
            ReplCommand::Invalid("Unknown command: /frobnicate".to_string())
        );
    }

    #[test]
    fn test_resolve_choice() {
        let options = vec!["First".to_string(), "Second".to_string()];
        assert_eq!(resolve_choice("2", &options), "Second");
        assert_eq!(resolve_choice("0", &options), "0");
        assert_eq!(resolve_choice("9", &options), "9");
        assert_eq!(resolve_choice("Custom", &options), "Custom");
    }
}
