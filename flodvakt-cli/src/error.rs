use std::path::PathBuf;

use flodvakt_config::ConfigError;
use flodvakt_telemetry::metrics::MetricsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario {} could not be decoded: {reason}", .path.display())]
    Scenario { path: PathBuf, reason: String },

    #[error("Output encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}
