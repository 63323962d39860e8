//! ## flodvakt-core::history
//! **Rolling baseline and deviation-based anomaly detection**
//!
//! Closed snapshots are kept in window-close order. Retention is time based:
//! once the span between the oldest and newest snapshot exceeds the comparison
//! interval the oldest entries are dropped (FIFO).
//!
//! Detection compares the latest snapshot against the mean of every other
//! retained snapshot. A feature is flagged when
//! `|latest - mean| > threshold * mean`. With a zero baseline any nonzero
//! observation is flagged.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::error::DetectionError;
use crate::snapshot::{Feature, FeatureSnapshot};

/// One flagged feature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Anomaly {
    pub feature: Feature,
    /// `|latest - baseline|`
    pub deviation: f64,
    pub latest: f64,
    /// Mean over all retained snapshots except the latest.
    pub baseline: f64,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Anomaly detected in {} (change: {:.2})",
            self.feature, self.deviation
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "anomalies", rename_all = "snake_case")]
pub enum AnomalyReport {
    NoneDetected,
    /// Flagged features in declaration order. Never empty.
    Detected(Vec<Anomaly>),
}

impl AnomalyReport {
    pub fn is_anomalous(&self) -> bool {
        matches!(self, AnomalyReport::Detected(_))
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        match self {
            AnomalyReport::NoneDetected => &[],
            AnomalyReport::Detected(anomalies) => anomalies,
        }
    }
}

/// Bounded sequence of closed-window snapshots.
#[derive(Debug, Clone)]
pub struct ComparisonHistory {
    snapshots: VecDeque<FeatureSnapshot>,
    retention: Duration,
    threshold: f64,
}

impl ComparisonHistory {
    pub fn new(retention: Duration, threshold: f64) -> Self {
        Self {
            snapshots: VecDeque::new(),
            retention,
            threshold,
        }
    }

    /// Appends a snapshot and evicts expired ones. Returns the number evicted.
    ///
    /// The newest snapshot is never evicted.
    pub fn snapshot_push(&mut self, snapshot: FeatureSnapshot) -> usize {
        let newest = snapshot.closed_at;
        self.snapshots.push_back(snapshot);

        let mut evicted = 0;
        while self.snapshots.len() > 1 {
            let oldest = self.snapshots[0].closed_at;
            if newest.saturating_sub(oldest) <= self.retention {
                break;
            }
            self.snapshots.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, retained = self.snapshots.len(), "Evicted expired snapshots");
        }
        evicted
    }

    /// Compares the latest snapshot against the mean of the rest.
    ///
    /// Read-only: repeated calls without new snapshots return the same report.
    pub fn detect_anomalies(&self) -> Result<AnomalyReport, DetectionError> {
        let available = self.snapshots.len();
        let latest = match self.snapshots.back() {
            Some(latest) if available >= 2 => latest,
            _ => return Err(DetectionError::InsufficientHistory { available }),
        };
        let rest = self.snapshots.range(..available - 1);
        let rest_len = (available - 1) as f64;
        let anomalies: Vec<Anomaly> = Feature::ALL
            .iter()
            .filter_map(|&feature| {
                let baseline = rest.clone().map(|s| s.value(feature)).sum::<f64>() / rest_len;
                let latest = latest.value(feature);
                let deviation = (latest - baseline).abs();
                (deviation > baseline * self.threshold).then_some(Anomaly {
                    feature,
                    deviation,
                    latest,
                    baseline,
                })
            })
            .collect();

        debug!(
            compared = available - 1,
            flagged = anomalies.len(),
            "Anomaly detection complete"
        );

        if anomalies.is_empty() {
            Ok(AnomalyReport::NoneDetected)
        } else {
            Ok(AnomalyReport::Detected(anomalies))
        }
    }

    pub fn latest(&self) -> Option<&FeatureSnapshot> {
        self.snapshots.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSnapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.3;

    fn snapshot(closed_secs: u64, total_packets: u64) -> FeatureSnapshot {
        FeatureSnapshot {
            entropy_source_ip: 1.0,
            entropy_destination_ip: 1.0,
            entropy_packet_size: 1.0,
            total_packets,
            total_bytes: 1000,
            syn_count: 10,
            icmp_unreachable_count: 2,
            unique_source_ip_count: 4,
            window_start: Duration::from_secs(closed_secs.saturating_sub(10)),
            closed_at: Duration::from_secs(closed_secs),
            flow_count: total_packets,
        }
    }

    fn history() -> ComparisonHistory {
        ComparisonHistory::new(Duration::from_secs(100), THRESHOLD)
    }

    #[test]
    fn test_insufficient_history() {
        let mut history = history();
        assert_eq!(
            history.detect_anomalies(),
            Err(DetectionError::InsufficientHistory { available: 0 })
        );
        history.snapshot_push(snapshot(10, 100));
        assert_eq!(
            history.detect_anomalies(),
            Err(DetectionError::InsufficientHistory { available: 1 })
        );
    }

    #[test]
    fn test_stable_history_reports_none() {
        let mut history = history();
        for i in 1..=4 {
            history.snapshot_push(snapshot(i * 10, 100));
        }
        assert_eq!(history.detect_anomalies(), Ok(AnomalyReport::NoneDetected));
    }

    #[test]
    fn test_doubling_is_flagged() {
        let mut history = history();
        history.snapshot_push(snapshot(10, 100));
        history.snapshot_push(snapshot(20, 100));
        history.snapshot_push(snapshot(30, 200));

        let report = history.detect_anomalies().unwrap();
        assert!(report.is_anomalous());
        let anomalies = report.anomalies();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].feature, Feature::TotalPackets);
        assert_eq!(anomalies[0].deviation, 100.0);
        assert_eq!(anomalies[0].baseline, 100.0);
        assert_eq!(anomalies[0].latest, 200.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut history = history();
        history.snapshot_push(snapshot(10, 100));
        history.snapshot_push(snapshot(20, 130));
        assert_eq!(history.detect_anomalies(), Ok(AnomalyReport::NoneDetected));
    }

    #[test]
    fn test_zero_baseline_flags_any_nonzero() {
        let mut history = history();
        let mut quiet = snapshot(10, 100);
        quiet.icmp_unreachable_count = 0;
        history.snapshot_push(quiet.clone());
        let mut noisy = snapshot(20, 100);
        noisy.icmp_unreachable_count = 1;
        history.snapshot_push(noisy);

        let report = history.detect_anomalies().unwrap();
        assert_eq!(report.anomalies().len(), 1);
        assert_eq!(report.anomalies()[0].feature, Feature::IcmpUnreachableCount);

        // zero stays zero: not flagged
        let mut history = self::history();
        history.snapshot_push(quiet.clone());
        history.snapshot_push(quiet);
        assert_eq!(history.detect_anomalies(), Ok(AnomalyReport::NoneDetected));
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mut history = history();
        history.snapshot_push(snapshot(10, 100));
        history.snapshot_push(snapshot(20, 300));
        assert_eq!(history.detect_anomalies(), history.detect_anomalies());
    }

    #[test]
    fn test_eviction_by_elapsed_snapshot_time() {
        let mut history = history();
        for i in 0..=10 {
            assert_eq!(history.snapshot_push(snapshot(i * 10, 100)), 0);
        }
        assert_eq!(history.len(), 11);
        assert_eq!(history.snapshot_push(snapshot(110, 100)), 1);
        assert_eq!(history.iter().next().unwrap().closed_at, Duration::from_secs(10));
        assert_eq!(history.latest().unwrap().closed_at, Duration::from_secs(110));
    }

    #[test]
    fn test_newest_is_never_evicted() {
        let mut history = history();
        history.snapshot_push(snapshot(10, 100));
        assert_eq!(history.snapshot_push(snapshot(10_000, 100)), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_anomaly_display() {
        let anomaly = Anomaly {
            feature: Feature::SynCount,
            deviation: 12.345,
            latest: 22.345,
            baseline: 10.0,
        };
        assert_eq!(
            anomaly.to_string(),
            "Anomaly detected in syn_count (change: 12.35)"
        );
    }
}
