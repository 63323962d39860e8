//! ## flodvakt-telemetry::logging
//! **Structured logging with tracing**
//!
//! `RUST_LOG` takes precedence over the configured level.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use flodvakt_core::{AnomalyReport, FeatureSnapshot};

pub type InitError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global human-readable subscriber. Logs go to stderr so
    /// stdout stays free for feature output.
    pub fn init(level: &str) -> Result<(), InitError> {
        fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(Self::filter(level))
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
    }

    /// Installs the global JSON subscriber.
    pub fn init_json(level: &str) -> Result<(), InitError> {
        fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(Self::filter(level))
            .with_current_span(true)
            .try_init()
    }

    fn filter(level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }

    pub fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!("flow_event", event_type = event_type, otel.kind = "INTERNAL");
        let _entered = span.enter();
        tracing::info!(metadata = ?metadata, "Flow event occurred");
    }

    /// Logs a closed window with its feature values.
    pub fn log_snapshot(snapshot: &FeatureSnapshot) {
        Self::log_event(
            "window_closed",
            vec![
                KeyValue::new("closed_at_secs", snapshot.closed_at.as_secs_f64()),
                KeyValue::new("flows", snapshot.flow_count as i64),
                KeyValue::new("total_packets", snapshot.total_packets as i64),
                KeyValue::new("entropy_source_ip", snapshot.entropy_source_ip),
            ],
        );
    }

    /// Logs every flagged feature at `warn`.
    pub fn log_report(report: &AnomalyReport) {
        for anomaly in report.anomalies() {
            tracing::warn!(
                feature = %anomaly.feature,
                deviation = anomaly.deviation,
                latest = anomaly.latest,
                baseline = anomaly.baseline,
                "{}",
                anomaly
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flodvakt_core::{Anomaly, Feature};
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        EventLogger::log_event("test", vec![KeyValue::new("key", "value")]);
        assert!(logs_contain("Flow event occurred"));
    }

    #[traced_test]
    #[test]
    fn test_report_logs_each_anomaly() {
        let report = AnomalyReport::Detected(vec![Anomaly {
            feature: Feature::SynCount,
            deviation: 90.0,
            latest: 100.0,
            baseline: 10.0,
        }]);
        EventLogger::log_report(&report);
        assert!(logs_contain("Anomaly detected in syn_count"));
    }
}
