//! REPL (Read-Eval-Print Loop) for interactive comparison sessions

use super::command::{ReplCommand, resolve_choice};
use crate::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use stack_application::{AssessmentManager, SessionOpError, SessionStore, TurnOrchestrator};
use stack_domain::{ASSESSMENT_CRITERIA, AgentSlot, Intent, Session, Turn};
use std::sync::Arc;

/// Interactive chat REPL
pub struct ChatRepl {
    store: Arc<SessionStore>,
    turns: TurnOrchestrator,
    assessments: AssessmentManager,
    config: ReplConfig,
}

impl ChatRepl {
    /// Create a new ChatRepl over an existing session
    pub fn new(
        store: Arc<SessionStore>,
        turns: TurnOrchestrator,
        assessments: AssessmentManager,
    ) -> Self {
        Self {
            store,
            turns,
            assessments,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if self.handle(ReplCommand::parse(line)).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        self.store.discard();
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn prompt(&self) -> String {
        let session = self.store.snapshot();
        if Self::has_comparison(&session) {
            format!("follow-up {}> ", session.next_follow_up_index())
        } else {
            ">>> ".to_string()
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Intern Stack - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        self.print_selection();
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /agent1 <id>, /agent2 <id> - Select the agents to compare");
        println!("  /agents                    - List available agents");
        println!("  /practice [n|text]         - Toggle a best practice (no argument lists them)");
        println!("  /criterion [n|text]        - Toggle an assessment criterion");
        println!("  /new [question]            - Start a fresh comparison");
        println!("  /assess [turn]             - Cross-assess a turn (default: latest)");
        println!("  /retry                     - Dismiss the current error");
        println!("  /show, /json               - Show the whole session");
        println!("  /help, /quit");
        println!();
        println!("Type a question to compare; once answered, further lines are follow-ups.");
        println!();
    }

    fn print_selection(&self) {
        let session = self.store.snapshot();
        let slot = |id: Option<&str>| id.map(str::to_string).unwrap_or_else(|| "-".to_string());
        println!(
            "Agents: {} vs {}",
            slot(session.agent_id(AgentSlot::First)),
            slot(session.agent_id(AgentSlot::Second))
        );
    }

    /// Handle one parsed line. Returns true if should exit.
    async fn handle(&self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Agents => {
                println!("{}", ConsoleFormatter::format_catalog(self.store.snapshot().catalog()));
            }
            ReplCommand::Select { slot, agent_id } => {
                if self.dispatch(Intent::SelectAgent { slot, agent_id }) {
                    self.print_selection();
                }
            }
            ReplCommand::Practice(None) => {
                let session = self.store.snapshot();
                Self::print_choices(
                    session.catalog().best_practices(),
                    |p| session.selected_practices().contains(p),
                );
            }
            ReplCommand::Practice(Some(arg)) => {
                let options = self.store.snapshot().catalog().best_practices().to_vec();
                self.dispatch(Intent::TogglePractice(resolve_choice(&arg, &options)));
            }
            ReplCommand::Criterion(None) => {
                let session = self.store.snapshot();
                let options = Self::criteria();
                Self::print_choices(&options, |c| session.selected_criteria().contains(c));
            }
            ReplCommand::Criterion(Some(arg)) => {
                self.dispatch(Intent::ToggleCriterion(resolve_choice(&arg, &Self::criteria())));
            }
            ReplCommand::New(question) => {
                if let Some(question) = question {
                    self.dispatch(Intent::EditQuestion(question));
                }
                self.compare().await;
            }
            ReplCommand::Assess(index) => {
                let session = self.store.snapshot();
                let index = index.or_else(|| {
                    session
                        .turns()
                        .iter()
                        .rev()
                        .find(|t| t.is_completed())
                        .map(Turn::index)
                });
                match index {
                    Some(index) => self.assess(index).await,
                    None => println!("{}", "Nothing to assess yet.".yellow()),
                }
            }
            ReplCommand::Retry => {
                self.dispatch(Intent::Retry);
            }
            ReplCommand::Show(format) => {
                println!("{}", ConsoleFormatter.render(&self.store.snapshot(), format));
            }
            ReplCommand::Ask(text) => {
                let session = self.store.snapshot();
                if Self::has_comparison(&session) {
                    let index = session.next_follow_up_index();
                    self.dispatch(Intent::EditFollowUp { index, text });
                    self.report(self.turns.submit_follow_up(index).await.map(|_| ()));
                } else {
                    self.dispatch(Intent::EditQuestion(text));
                    self.compare().await;
                }
            }
            ReplCommand::Invalid(message) => {
                println!("{}", message);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn compare(&self) {
        self.report(self.turns.submit_comparison().await.map(|_| ()));
    }

    async fn assess(&self, index: usize) {
        self.report(self.assessments.submit_assessment(index).await.map(|_| ()));
    }

    /// Print the outcome of an operation.
    fn report(&self, result: Result<(), SessionOpError>) {
        match result {
            Ok(()) => {
                println!();
                println!(
                    "{}",
                    ConsoleFormatter.render(&self.store.snapshot(), self.config.format)
                );
            }
            Err(SessionOpError::Failed(error)) => {
                println!("{}", ConsoleFormatter::format_error(&error));
                println!("{}", "Use /retry to dismiss, then resubmit.".dimmed());
            }
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }

    /// Apply an intent, printing the rejection if any.
    fn dispatch(&self, intent: Intent) -> bool {
        match self.store.dispatch(intent) {
            Ok(()) => true,
            Err(e) => {
                println!("{}", e.to_string().yellow());
                false
            }
        }
    }

    fn print_choices(options: &[String], selected: impl Fn(&String) -> bool) {
        if options.is_empty() {
            println!("(none available)");
        }
        for (i, option) in options.iter().enumerate() {
            let mark = if selected(option) { "[x]".green() } else { "[ ]".normal() };
            println!("  {} {:>2}. {}", mark, i + 1, option);
        }
    }

    fn criteria() -> Vec<String> {
        ASSESSMENT_CRITERIA.iter().map(|c| c.to_string()).collect()
    }

    fn has_comparison(session: &Session) -> bool {
        session.turn(0).is_some_and(Turn::is_completed)
    }
}
