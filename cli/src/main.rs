//! CLI entrypoint for strata
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use strata_application::{ExecutionMode, HandlerRegistry, NoProgress, RunPlanUseCase};
use strata_infrastructure::{CommandHandler, ConfigLoader, load_plan};
use strata_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let plan_path = match &cli.plan {
        Some(path) => path,
        None => bail!("A plan document is required. See --help for the format."),
    };

    // Layered config, then command-line overrides
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("config error: {e}"))?
    };

    let mut params = file_config.engine_params();
    if cli.sequential {
        params.mode = ExecutionMode::Sequential;
    }
    if let Some(limit) = cli.concurrency {
        params.concurrency_limit = limit;
    }
    if let Some(secs) = cli.timeout {
        params.step_timeout = Duration::from_secs(secs);
    }

    let plan = load_plan(plan_path)?;
    info!(plan = %plan_path.display(), steps = plan.len(), "loaded plan");

    // === Dependency Injection ===
    // Built-in handlers; library users register their own capabilities here.
    #[allow(unused_mut)]
    let mut registry = HandlerRegistry::new().register("command", CommandHandler::new());
    #[cfg(feature = "web-handlers")]
    {
        registry = registry.register(
            "read_url",
            strata_infrastructure::WebFetchHandler::new(),
        );
    }
    let registry = Arc::new(registry);

    // Ctrl-C cancels the run: in-flight steps settle, the rest are skipped
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let use_case = RunPlanUseCase::new(registry, params).with_cancellation(token);

    let result = if cli.quiet {
        use_case.execute(&plan, &NoProgress).await?
    } else {
        let progress = if cli.verbose > 0 {
            ProgressReporter::verbose()
        } else {
            ProgressReporter::new()
        };
        use_case.execute(&plan, &progress).await?
    };

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Synthesis => ConsoleFormatter::format_synthesis_only(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{output}");

    if !result.success() {
        std::process::exit(1);
    }

    Ok(())
}
