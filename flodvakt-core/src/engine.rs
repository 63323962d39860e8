//! ## flodvakt-core::engine
//! **Ingestion and window rollover**
//!
//! ### Rollover ordering:
//! The elapsed-time check runs *before* the incoming flow is added. When it
//! trips, the open window is closed without that flow, and the flow starts the
//! next window with its timestamp as the new window start.
//!
//! ### Out-of-order input:
//! Elapsed time is measured against the latest observed timestamp, not the
//! maximum. A late flow never reopens a closed window but can shorten the
//! apparent age of the open one.

use std::time::Duration;

use tracing::{debug, info, instrument, trace};

use crate::error::{DetectionError, EngineError};
use crate::flow::FlowRecord;
use crate::history::{AnomalyReport, ComparisonHistory};
use crate::snapshot::FeatureSnapshot;
use crate::window::AggregationWindow;

/// Timing and detection parameters for a [`SlidingWindowEngine`].
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// How often a window closes.
    pub sliding_window_interval: Duration,
    /// Carried for consumers; not enforced as a separate timer.
    pub aggregate_window_duration: Duration,
    /// How much snapshot history is retained for comparison.
    pub comparison_window_interval: Duration,
    /// Relative deviation from the baseline that flags a feature.
    pub deviation_threshold: f64,
}

impl EngineConfig {
    pub const DEFAULT_DEVIATION_THRESHOLD: f64 = 0.3;

    pub fn new(
        sliding_window_interval: Duration,
        aggregate_window_duration: Duration,
        comparison_window_interval: Duration,
    ) -> Result<Self, EngineError> {
        let config = Self {
            sliding_window_interval,
            aggregate_window_duration,
            comparison_window_interval,
            deviation_threshold: Self::DEFAULT_DEVIATION_THRESHOLD,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_deviation_threshold(mut self, threshold: f64) -> Result<Self, EngineError> {
        self.deviation_threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sliding_window_interval.is_zero() {
            return Err(EngineError::InvalidConfig(
                "sliding window interval must be non-zero".into(),
            ));
        }
        // A shorter retention keeps only the newest snapshot, so detection never gets a baseline.
        if self.comparison_window_interval < self.sliding_window_interval {
            return Err(EngineError::InvalidConfig(format!(
                "comparison window interval ({:?}) must be at least the sliding window interval ({:?})",
                self.comparison_window_interval, self.sliding_window_interval
            )));
        }
        if !self.deviation_threshold.is_finite() || self.deviation_threshold < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "deviation threshold must be a finite non-negative number, got {}",
                self.deviation_threshold
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sliding_window_interval: Duration::from_secs(1200),
            aggregate_window_duration: Duration::from_secs(6000),
            comparison_window_interval: Duration::from_secs(12000),
            deviation_threshold: Self::DEFAULT_DEVIATION_THRESHOLD,
        }
    }
}

/// Outcome of a single [`SlidingWindowEngine::ingest`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// The flow was added to the open window.
    Pending,
    /// The open window closed before the flow was added.
    Closed(FeatureSnapshot),
}

impl WindowEvent {
    pub fn is_closed(&self) -> bool {
        matches!(self, WindowEvent::Closed(_))
    }

    pub fn snapshot(&self) -> Option<&FeatureSnapshot> {
        match self {
            WindowEvent::Closed(snapshot) => Some(snapshot),
            WindowEvent::Pending => None,
        }
    }

    pub fn into_snapshot(self) -> Option<FeatureSnapshot> {
        match self {
            WindowEvent::Closed(snapshot) => Some(snapshot),
            WindowEvent::Pending => None,
        }
    }
}

/// Single owner of the open window and the comparison history.
#[derive(Debug, Clone)]
pub struct SlidingWindowEngine {
    config: EngineConfig,
    window: AggregationWindow,
    history: ComparisonHistory,
}

impl SlidingWindowEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let history =
            ComparisonHistory::new(config.comparison_window_interval, config.deviation_threshold);
        Ok(Self {
            config,
            window: AggregationWindow::new(),
            history,
        })
    }

    /// Feeds one flow into the engine.
    ///
    /// Returns [`WindowEvent::Closed`] with the finished window's snapshot when
    /// this flow's timestamp is at least one sliding interval past the window
    /// start. Never fails.
    pub fn ingest(&mut self, flow: &FlowRecord) -> WindowEvent {
        trace!(
            timestamp = ?flow.timestamp,
            source = %flow.source_ip,
            packets = flow.packet_count,
            "Ingesting flow"
        );
        self.window.time_observe(flow.timestamp);

        let elapsed = self.window.elapsed();
        let event = if elapsed >= self.config.sliding_window_interval {
            debug!(?elapsed, interval = ?self.config.sliding_window_interval, "Window interval reached");
            WindowEvent::Closed(self.window_close())
        } else {
            WindowEvent::Pending
        };

        self.window.flow_add(flow);
        event
    }

    #[instrument(level = "debug", name = "window_close", skip(self))]
    fn window_close(&mut self) -> FeatureSnapshot {
        let snapshot = self.window.compute_features();
        info!(
            window_start = ?snapshot.window_start,
            closed_at = ?snapshot.closed_at,
            flows = snapshot.flow_count,
            total_packets = snapshot.total_packets,
            total_bytes = snapshot.total_bytes,
            syn_count = snapshot.syn_count,
            icmp_unreachable = snapshot.icmp_unreachable_count,
            unique_sources = snapshot.unique_source_ip_count,
            entropy_source_ip = snapshot.entropy_source_ip,
            entropy_destination_ip = snapshot.entropy_destination_ip,
            entropy_packet_size = snapshot.entropy_packet_size,
            "Window closed"
        );

        self.history.snapshot_push(snapshot.clone());
        self.window.reset_at(snapshot.closed_at);
        snapshot
    }

    /// See [`ComparisonHistory::detect_anomalies`].
    pub fn detect_anomalies(&self) -> Result<AnomalyReport, DetectionError> {
        self.history.detect_anomalies()
    }

    /// Most recently closed window, if any.
    pub fn latest_snapshot(&self) -> Option<&FeatureSnapshot> {
        self.history.latest()
    }

    pub fn history(&self) -> &ComparisonHistory {
        &self.history
    }

    pub fn open_window_start(&self) -> Option<Duration> {
        self.window.earliest_time()
    }

    pub fn open_window_flows(&self) -> u64 {
        self.window.flow_count()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
