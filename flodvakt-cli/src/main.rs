//! ## flodvakt-cli
//! **Replay recorded flows through the feature engine**
//!
//! Closed windows and anomaly reports are written to stdout as JSON lines;
//! logs go to stderr.

use anyhow::Context;
use clap::Parser;

use flodvakt_config::FlodvaktConfig;
use flodvakt_telemetry::logging::EventLogger;

mod commands;
mod error;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FlodvaktConfig::load_from_path(path),
        None => FlodvaktConfig::load(),
    }
    .context("failed to load configuration")?;

    let telemetry = &config.telemetry;
    let logger = if telemetry.json_logs {
        EventLogger::init_json(&telemetry.log_level)
    } else {
        EventLogger::init(&telemetry.log_level)
    };
    logger.map_err(|e| anyhow::anyhow!(e))?;

    commands::run_command(cli, &config)?;
    Ok(())
}
