//! sigplan CLI: validate, inspect and optimize fixed-time traffic signal
//! schedules.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::SigplanConfig;

#[derive(Parser)]
#[command(name = "sigplan", version, about = "Fixed-time traffic signal schedules")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a schedule against the safety restrictions of an intersection
    Validate {
        /// Intersection JSON (bare or a desktop export)
        #[arg(long)]
        intersection: PathBuf,
        /// Fixed-time schedule JSON
        #[arg(long)]
        schedule: PathBuf,
        /// Tolerance in seconds for bounds and relations
        #[arg(long)]
        tolerance: Option<f64>,
        /// Tolerance profile (default, strict, lenient)
        #[arg(long)]
        profile: Option<String>,
        /// Report format (human, json)
        #[arg(long)]
        report: Option<String>,
    },
    /// Summarize an intersection and optionally a schedule
    Inspect {
        /// Intersection JSON (bare or a desktop export)
        #[arg(long)]
        intersection: PathBuf,
        /// Fixed-time schedule JSON
        #[arg(long)]
        schedule: Option<PathBuf>,
    },
    /// Request an optimized schedule from the remote optimizer
    Optimize {
        /// Intersection JSON (bare or a desktop export)
        #[arg(long)]
        intersection: PathBuf,
        /// Arrival rates JSON in PCE/h (bare or a desktop export)
        #[arg(long)]
        arrival_rates: PathBuf,
        /// Objective (min-delay, min-period, max-capacity)
        #[arg(long)]
        objective: Option<String>,
        /// Minimum period duration in seconds
        #[arg(long)]
        min_period: Option<f64>,
        /// Maximum period duration in seconds
        #[arg(long)]
        max_period: Option<f64>,
        /// Horizon in hours over which initial queues are spread
        #[arg(long)]
        horizon: Option<f64>,
        /// Write the schedule and phase diagram to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Create a sigplan.toml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init => commands::init::run(&cwd),

        Commands::Validate {
            intersection,
            schedule,
            tolerance,
            profile,
            report,
        } => {
            let config = load_config_optional(&cwd)?;
            commands::validate::run(
                config.as_ref(),
                &intersection,
                &schedule,
                tolerance,
                profile.as_deref(),
                report.as_deref(),
            )
        }

        Commands::Inspect {
            intersection,
            schedule,
        } => commands::inspect::run(&intersection, schedule.as_deref()),

        Commands::Optimize {
            intersection,
            arrival_rates,
            objective,
            min_period,
            max_period,
            horizon,
            output,
        } => {
            let config = load_config_optional(&cwd)?;
            let options = commands::optimize::OptimizeOptions {
                intersection: &intersection,
                arrival_rates: &arrival_rates,
                objective: objective.as_deref(),
                min_period,
                max_period,
                horizon,
                output: output.as_deref(),
            };
            commands::optimize::run(config.as_ref(), &options)
        }
    }
}

/// Load `sigplan.toml` from the current directory upward, if there is one.
fn load_config_optional(cwd: &Path) -> anyhow::Result<Option<SigplanConfig>> {
    match SigplanConfig::find_and_load(cwd)? {
        Some((config, dir)) => {
            debug!(dir = %dir.display(), "using sigplan.toml");
            Ok(Some(config))
        }
        None => {
            debug!(cwd = %cwd.display(), "no sigplan.toml found, using defaults");
            Ok(None)
        }
    }
}
