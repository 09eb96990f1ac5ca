//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for session results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every turn with its assessments
    Full,
    /// Only the latest pair of answers
    Answers,
    /// JSON snapshot of the session
    Json,
}

impl From<OutputFormat> for stack_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Answers => Self::Answers,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for intern-stack
#[derive(Parser, Debug)]
#[command(name = "intern-stack")]
#[command(author, version, about = "Compare two AI agents side by side")]
#[command(long_about = r#"
Intern Stack asks two AI agents the same question and shows their answers
side by side. Follow-up questions carry the whole conversation so far, and
each agent can be asked to critique the other's answer.

Configuration files are loaded from (in priority order):
1. INTERN_STACK_* environment variables
2. --config <path>            Explicit config file
3. ./intern-stack.toml        Project-level config
4. ~/.config/intern-stack/config.toml   Global config

Example:
  intern-stack -a gpt-4 -b mistral-7b "What is 2+2?"
  intern-stack -a gpt-4 -b mistral-7b -f "Explain" -C "Technical depth" "What is 2+2?"
  intern-stack --list-agents
  intern-stack --chat
"#)]
pub struct Cli {
    /// The question to ask both agents (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// First agent id
    #[arg(short = 'a', long, value_name = "AGENT")]
    pub agent1: Option<String>,

    /// Second agent id
    #[arg(short = 'b', long, value_name = "AGENT")]
    pub agent2: Option<String>,

    /// Best-practice phrase to append (can be specified multiple times)
    #[arg(short, long, value_name = "PHRASE")]
    pub practice: Vec<String>,

    /// Follow-up question asked after the comparison (repeatable, asked in order)
    #[arg(short, long = "follow-up", value_name = "QUESTION")]
    pub follow_up: Vec<String>,

    /// Cross-assess every answered turn on this criterion (repeatable)
    #[arg(short = 'C', long, value_name = "CRITERION")]
    pub criterion: Vec<String>,

    /// List the available agents and best practices, then exit
    #[arg(long)]
    pub list_agents: bool,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Base URL of the comparison API
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Deadline for each request in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write a JSONL transcript of the session to this file
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
