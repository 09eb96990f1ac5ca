//! CLI entrypoint for Intern Stack
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use stack_application::{
    AssessmentManager, ComparisonBackend, ConversationLogger, LoadCatalogUseCase,
    NoConversationLogger, NoObserver, SessionObserver, SessionParams, SessionStore,
    TurnOrchestrator,
};
use stack_domain::{AgentSlot, ComparisonRequest, Intent, OutputFormat, Turn};
use stack_infrastructure::{
    ConfigLoader, FileConfig, FileLoggingConfig, HttpBackend, JsonlConversationLogger,
};
use stack_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, ReplConfig,
    SimpleProgress,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources() {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, &config.logging);
    info!("Starting Intern Stack");

    check_config(&config)?;
    if !config.output.color {
        ConsoleFormatter::disable_color();
    }

    let format: OutputFormat = match cli.output {
        Some(format) => format.into(),
        None => config.output.parse_format().0,
    };
    let params =
        SessionParams::from_timeout_seconds(cli.timeout.unwrap_or(config.backend.timeout_secs));
    let base_url = cli
        .base_url
        .clone()
        .unwrap_or_else(|| config.backend.base_url.clone());

    // === Dependency Injection ===
    let backend: Arc<dyn ComparisonBackend> = Arc::new(
        HttpBackend::new(base_url).context("Cannot reach the comparison API")?,
    );

    let show_progress = !cli.quiet && config.repl.show_progress && format != OutputFormat::Json;
    let observer: Arc<dyn SessionObserver> = if !show_progress {
        Arc::new(NoObserver)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress::new())
    };
    let store = Arc::new(SessionStore::new(observer));

    let log_path = cli
        .log
        .clone()
        .or_else(|| config.logging.conversation_log.as_ref().map(PathBuf::from));
    let conversation_logger: Arc<dyn ConversationLogger> =
        match log_path.and_then(JsonlConversationLogger::open) {
            Some(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoConversationLogger),
        };

    let turns = TurnOrchestrator::new(backend.clone(), store.clone())
        .with_params(params.clone())
        .with_conversation_logger(conversation_logger.clone());
    let assessments = AssessmentManager::new(backend.clone(), store.clone())
        .with_params(params.clone())
        .with_conversation_logger(conversation_logger);

    let catalog = LoadCatalogUseCase::new(backend, store.clone())
        .with_params(params)
        .execute()
        .await;

    if cli.list_agents {
        let catalog = catalog?;
        println!("{}", ConsoleFormatter::format_catalog(&catalog));
        return Ok(());
    }

    if let Err(e) = catalog {
        // The error stays on the session until the next submission clears it.
        // Agent ids are then sent unchecked; the backend still validates them.
        warn!("{}", e);
    }

    // Chat mode
    if cli.chat {
        for (slot, agent_id) in [(AgentSlot::First, &cli.agent1), (AgentSlot::Second, &cli.agent2)]
        {
            if let Some(agent_id) = agent_id {
                store.dispatch(Intent::SelectAgent {
                    slot,
                    agent_id: Some(agent_id.clone()),
                })?;
            }
        }
        for practice in &cli.practice {
            store.dispatch(Intent::TogglePractice(practice.clone()))?;
        }

        let repl_config = ReplConfig {
            format,
            history_file: config.repl.history_file.as_ref().map(PathBuf::from),
        };
        ChatRepl::new(store, turns, assessments)
            .with_config(repl_config)
            .run()
            .await?;
        return Ok(());
    }

    // Single question mode - question is required
    let question = match cli.question {
        Some(q) => q,
        None => bail!("Question is required. Use --chat for interactive mode."),
    };

    let request = ComparisonRequest {
        agent1_id: cli.agent1,
        agent2_id: cli.agent2,
        question,
        best_practices: cli.practice,
    };

    let mut outcome = turns.start_comparison(request).await.map(|_| ());
    for (offset, follow_up) in cli.follow_up.iter().enumerate() {
        if outcome.is_err() {
            break;
        }
        outcome = turns.start_follow_up(offset + 1, follow_up).await.map(|_| ());
    }

    if outcome.is_ok() && !cli.criterion.is_empty() {
        let answered: Vec<usize> = store
            .snapshot()
            .turns()
            .iter()
            .filter(|t| t.is_completed())
            .map(Turn::index)
            .collect();
        for index in answered {
            outcome = assessments
                .request_assessment(index, cli.criterion.iter().cloned())
                .await
                .map(|_| ());
            if outcome.is_err() {
                break;
            }
        }
    }

    let session = store.snapshot();
    if !session.turns().is_empty() {
        println!("{}", ConsoleFormatter.render(&session, format));
    }

    outcome.map_err(Into::into)
}

/// Install the tracing subscriber.
///
/// Verbosity picks the level; `[logging] file_dir` adds a daily-rolling
/// log file whose writer guard must outlive `main`.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match &logging.file_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "intern-stack.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

/// Report config issues; errors abort, warnings are logged.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    let errors: Vec<&str> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}
