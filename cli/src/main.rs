//! CLI entrypoint for Hive Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    ConversationLogger, DeliberationOrchestrator, DiscussionLogStore, NoConversationLogger,
    NoStageProgress, SharedMemoryBank, StageProgressNotifier,
};
use council_domain::{DiscussionSnapshot, TaskStatus};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiCompatibleReasoning,
};
use council_presentation::{
    Cli, ConsoleFormatter, DeliberationReport, DiscussionView, OutputConfig, OutputFormatter,
    ProgressReporter,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| config.logging.log_dir.as_ref().map(PathBuf::from));
    let _log_guard = init_tracing(cli.verbose, log_dir.as_ref());

    info!("Starting Hive Council");

    if cli.show_config {
        println!("Configuration sources (lowest to highest priority):");
        for source in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("  {}", source);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let issues = config.validate_deliberation();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("config error: {}", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }

    let Some(task) = cli.task.clone() else {
        bail!("A task is required. Run with --help for usage.");
    };

    let output = output_config(&cli, &config);
    output.apply_color();

    // === Dependency Injection ===
    let council = config.to_council_config();
    let reasoning = Arc::new(OpenAiCompatibleReasoning::from_config(&config.reasoning));
    let log = Arc::new(DiscussionLogStore::default());
    let memory = Arc::new(SharedMemoryBank::new(council.memory_capacity));

    let reporter = output.show_progress.then(|| Arc::new(ProgressReporter::new()));
    let progress: Arc<dyn StageProgressNotifier> = match &reporter {
        Some(r) => r.clone(),
        None => Arc::new(NoStageProgress),
    };
    let conversation_logger: Arc<dyn ConversationLogger> = match config
        .logging
        .conversation_log
        .as_deref()
        .and_then(JsonlConversationLogger::open)
    {
        Some(logger) => Arc::new(logger),
        None => Arc::new(NoConversationLogger),
    };

    let orchestrator = DeliberationOrchestrator::new(reasoning, log.clone(), memory)
        .with_params(council.deliberation)
        .with_progress(progress)
        .with_conversation_logger(conversation_logger);

    let started = orchestrator.start_deliberation(&task)?;
    let task_id = started.task_id;
    info!(task_id = %task_id, "Deliberation started");

    // Live rendering of the discussion
    let mut subscription = orchestrator.subscribe(&task_id)?;
    let live = output.streams_live();
    let printer = reporter.clone();
    let view_task_id = task_id.clone();
    let render = tokio::spawn(async move {
        let mut view = DiscussionView::new(view_task_id);
        while let Some(update) = subscription.next().await {
            for entry in view.apply(update) {
                if !live {
                    continue;
                }
                let line = ConsoleFormatter::format_entry(&entry);
                match &printer {
                    Some(p) => p.println(line),
                    None => println!("{}", line),
                }
            }
        }
        view
    });

    let finished = tokio::select! {
        result = orchestrator.wait_for_completion(&task_id) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling deliberation");
            orchestrator.cancel_all();
            orchestrator.wait_for_completion(&task_id).await?
        }
    };

    let view = render.await.context("Discussion renderer panicked")?;
    if !view.is_contiguous() {
        warn!(task_id = %task_id, "Live view missed entries; using the stored log");
    }

    let snapshot = log
        .snapshot(&task_id)
        .unwrap_or_else(|| DiscussionSnapshot::empty(task_id.clone()));
    let report = DeliberationReport::new(&finished, &snapshot);
    println!("{}", ConsoleFormatter.render(&report, output.format));

    Ok(match finished.status() {
        TaskStatus::ConsensusReached => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

/// Initialize stderr logging from the verbosity level, plus a daily rolling
/// file log when a directory is given. The guard must live until exit.
fn init_tracing(verbose: u8, log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "hive-council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
    guard
}

/// Config file output settings with CLI flags applied on top
fn output_config(cli: &Cli, config: &FileConfig) -> OutputConfig {
    let format = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    let output = OutputConfig::default()
        .with_format(format)
        .with_color(config.output.color && !cli.no_color)
        .with_progress(config.output.show_progress && !cli.no_progress);
    if cli.quiet { output.quiet() } else { output }
}
