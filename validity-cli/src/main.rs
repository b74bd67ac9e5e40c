//! Replay form interactions through the validation engine.
//!
//! Usage:
//!   validity signup.json
//!   validity signup.json --config validity.json --log-file validity.log --log-level debug

mod run;
mod scenario;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use validity::ValidityConfig;

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "validity")]
#[command(about = "Validate a form scenario and print the resulting errors as JSON")]
struct Cli {
    /// Scenario file: the page, custom errors and interaction steps
    scenario: PathBuf,

    /// Engine config (classes, extra input type patterns)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Compact single-line output
    #[arg(long)]
    compact: bool,
}

fn init_logging(cli: &Cli) -> Result<()> {
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            WriteLogger::init(cli.log_level, Config::default(), file)
                .context("failed to initialize logger")?;
        }
        None => {
            TermLogger::init(
                cli.log_level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )
            .context("failed to initialize logger")?;
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => ValidityConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ValidityConfig::default(),
    };

    let json = std::fs::read_to_string(&cli.scenario)
        .with_context(|| format!("failed to read {}", cli.scenario.display()))?;
    let scenario = Scenario::from_json(&json)
        .with_context(|| format!("failed to parse {}", cli.scenario.display()))?;

    let report = run::run(scenario, config)?;

    let output = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{output}");

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
