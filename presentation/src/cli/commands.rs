//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for execution results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with per-step records
    Full,
    /// Only the final synthesis
    Synthesis,
    /// JSON output
    Json,
}

/// CLI arguments for strata
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about = "Plan execution engine - run declarative step plans")]
#[command(long_about = r#"
Strata executes a declarative plan: typed steps with priorities and
inter-step dependencies, run under a configurable concurrency policy.

The engine resolves the plan into execution layers, runs each layer with a
bounded worker pool, isolates per-step failures (only dependents of a
failed step are skipped), and synthesizes the settled results into one
budget-constrained report.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./strata.toml       Project-level config
3. ~/.config/strata/config.toml   Global config

Example:
  strata plan.toml
  strata plan.json --sequential --output synthesis
  strata plan.toml -j 8 --timeout 120
"#)]
pub struct Cli {
    /// Path to the plan document (JSON or TOML; not required with --show-config)
    pub plan: Option<PathBuf>,

    /// Run steps strictly one at a time, in schedule order
    #[arg(long)]
    pub sequential: bool,

    /// Maximum concurrent steps per layer
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Default per-step timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

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
