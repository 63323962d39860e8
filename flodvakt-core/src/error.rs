use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DetectionError {
    /// Fewer than two snapshots retained; retry once more windows have closed.
    #[error("Insufficient history for anomaly detection: {available} snapshot(s) retained, 2 required")]
    InsufficientHistory { available: usize },
}
