//! CLI entrypoint for conclave
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conclave_application::{
    CompositeObserver, ConclaveEnvironment, ConclaveObserver, ElectorAgent, RoundPlan,
    RunConclaveUseCase,
};
use conclave_domain::{ElectionRule, SpeakerPolicy};
use conclave_infrastructure::{
    ConfigLoader, FileConfig, JsonlEventLogger, LlmElector, LoadedRoster, OpenRouterClient,
    RosterLoader, ScriptedElector, ToolChannel,
};
use conclave_presentation::{
    Cli, ConsoleFormatter, ConsoleReporter, OutputFormat, progress_observer,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration, then let flags override it
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let _guard = init_logging(cli.verbose, &config.logging.dir);
    info!("Starting conclave");

    let Some(roster_path) = cli.roster.as_ref() else {
        bail!("A roster file is required. Use --roster <PATH>.");
    };
    let mut loaded = RosterLoader::load(roster_path)
        .with_context(|| format!("Failed to load roster {}", roster_path.display()))?;
    if let Some(limit) = cli.limit {
        loaded = loaded
            .truncated(limit)
            .with_context(|| format!("--limit {} leaves no electors", limit))?;
    }
    info!("Loaded {} electors from {}", loaded.len(), roster_path.display());

    // === Dependency Injection ===
    let agents = build_agents(&loaded, &config, cli.scripted)?;

    let mut observers = CompositeObserver::default();
    if cli.output == OutputFormat::Text {
        observers.push(Arc::new(ConsoleReporter::new(loaded.roster.clone())));
    }
    if !cli.quiet {
        let interactive = std::io::stderr().is_terminal();
        observers.push(progress_observer(loaded.roster.clone(), interactive));
    }
    if config.logging.transcript {
        let path = config.logging.dir.join(format!(
            "conclave_{}.jsonl",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ));
        match JsonlEventLogger::new(&path) {
            Some(logger) => {
                info!("Writing event transcript to {}", logger.path().display());
                observers.push(Arc::new(logger));
            }
            None => warn!("Event transcript disabled"),
        }
    }
    let observer: Arc<dyn ConclaveObserver> = Arc::new(observers);

    let params = config.to_params()?;
    let plan = if cli.single_ballot {
        RoundPlan::single_ballot()
    } else {
        config.to_round_plan()?
    };

    if cli.output == OutputFormat::Text && !cli.quiet {
        print_header(&loaded, &params.rule, &plan);
    }

    let mut env = ConclaveEnvironment::new(loaded.roster.clone(), agents, &params)?
        .with_observer(observer);

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current round");
            signal_token.cancel();
        }
    });

    let use_case = RunConclaveUseCase::new().with_cancellation(cancel);
    let result = use_case.execute(&mut env, &plan).await?;

    let output = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format(&result, &loaded.roster),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", output);

    Ok(())
}

/// Command-line flags take precedence over every config source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(speakers) = cli.speakers {
        config.election.speakers_per_round = speakers;
    }
    if let Some(policy) = cli.policy {
        config.election.speaker_policy = SpeakerPolicy::from(policy).as_str().to_string();
    }
    if let Some(rule) = cli.rule {
        config.election.rule = ElectionRule::from(rule).as_str().to_string();
    }
    if cli.max_rounds.is_some() {
        config.election.max_rounds = cli.max_rounds;
    }
    if cli.seed.is_some() {
        config.election.seed = cli.seed;
    }
    if let Some(workers) = cli.workers {
        config.executor.worker_cap = workers;
    }
    if let Some(model) = &cli.model {
        config.openrouter.model = model.clone();
    }
    if cli.no_transcript {
        config.logging.transcript = false;
    }
}

/// Stderr logging filtered by `-v`, plus a per-run log file when the
/// log directory is writable
fn init_logging(verbose: u8, dir: &Path) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let file = std::fs::create_dir_all(dir).ok().map(|_| {
        let name = format!("conclave_{}.log", chrono::Local::now().format("%Y%m%d_%H%M%S"));
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name))
    });
    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::new(filter)),
        )
        .with(file_layer.with_filter(EnvFilter::new("debug")))
        .init();

    guard
}

fn build_agents(
    loaded: &LoadedRoster,
    config: &FileConfig,
    scripted: bool,
) -> Result<Vec<Arc<dyn ElectorAgent>>> {
    if scripted {
        info!("Using scripted electors");
        return Ok(ScriptedElector::for_roster(loaded));
    }

    let client = OpenRouterClient::from_config(&config.openrouter).with_context(|| {
        format!(
            "Cannot reach OpenRouter. Set {} or use --scripted.",
            config.openrouter.api_key_env
        )
    })?;
    info!("Using LLM electors ({})", client.model());
    let channel: Arc<dyn ToolChannel> = Arc::new(client);
    Ok(LlmElector::for_roster(&loaded.roster, channel))
}

fn print_header(loaded: &LoadedRoster, rule: &ElectionRule, plan: &RoundPlan) {
    println!();
    println!("+============================================================+");
    println!("|                 Conclave - Papal Election                  |");
    println!("+============================================================+");
    println!();
    println!("Electors: {}", loaded.len());
    println!("Rule: {}", rule.description());
    if plan.discussion_enabled() {
        println!(
            "Discussion: {} speakers per round ({} selection)",
            plan.speakers_per_round, plan.policy
        );
    } else {
        println!("Discussion: none");
    }
    if let Some(max_rounds) = plan.max_rounds {
        println!("Round limit: {}", max_rounds);
    }
    println!();
}
