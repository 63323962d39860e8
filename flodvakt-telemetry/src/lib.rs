//! # flodvakt Telemetry
//!
//! Logging setup, structured event logging and prometheus metrics for the
//! flow feature engine.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
