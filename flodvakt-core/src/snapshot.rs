//! Feature snapshots emitted on window closure.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of features compared by anomaly detection.
pub const FEATURE_COUNT: usize = 8;

/// Features tracked per window, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    EntropySourceIp,
    EntropyDestinationIp,
    EntropyPacketSize,
    TotalPackets,
    TotalBytes,
    SynCount,
    IcmpUnreachableCount,
    UniqueSourceIpCount,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::EntropySourceIp,
        Feature::EntropyDestinationIp,
        Feature::EntropyPacketSize,
        Feature::TotalPackets,
        Feature::TotalBytes,
        Feature::SynCount,
        Feature::IcmpUnreachableCount,
        Feature::UniqueSourceIpCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::EntropySourceIp => "entropy_source_ip",
            Feature::EntropyDestinationIp => "entropy_destination_ip",
            Feature::EntropyPacketSize => "entropy_packet_size",
            Feature::TotalPackets => "total_packets",
            Feature::TotalBytes => "total_bytes",
            Feature::SynCount => "syn_count",
            Feature::IcmpUnreachableCount => "icmp_unreachable_count",
            Feature::UniqueSourceIpCount => "unique_source_ip_count",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Computed state of one closed window. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub entropy_source_ip: f64,
    pub entropy_destination_ip: f64,
    pub entropy_packet_size: f64,
    pub total_packets: u64,
    pub total_bytes: u64,
    pub syn_count: u64,
    pub icmp_unreachable_count: u64,
    pub unique_source_ip_count: u64,

    /// Timestamp of the first flow in the window.
    #[serde(with = "crate::time::secs")]
    pub window_start: Duration,
    /// Timestamp of the flow that triggered closure (excluded from this window).
    #[serde(with = "crate::time::secs")]
    pub closed_at: Duration,
    /// Flows observed in the window, including zero-packet flows.
    pub flow_count: u64,
}

impl FeatureSnapshot {
    /// Value of a single feature as `f64`.
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::EntropySourceIp => self.entropy_source_ip,
            Feature::EntropyDestinationIp => self.entropy_destination_ip,
            Feature::EntropyPacketSize => self.entropy_packet_size,
            Feature::TotalPackets => self.total_packets as f64,
            Feature::TotalBytes => self.total_bytes as f64,
            Feature::SynCount => self.syn_count as f64,
            Feature::IcmpUnreachableCount => self.icmp_unreachable_count as f64,
            Feature::UniqueSourceIpCount => self.unique_source_ip_count as f64,
        }
    }

    /// All features in declaration order, suitable as a model input row.
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|feature| self.value(feature))
    }

    pub fn window_duration(&self) -> Duration {
        self.closed_at.saturating_sub(self.window_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FeatureSnapshot {
        FeatureSnapshot {
            entropy_source_ip: 0.5,
            entropy_destination_ip: 1.0,
            entropy_packet_size: 1.5,
            total_packets: 10,
            total_bytes: 2000,
            syn_count: 4,
            icmp_unreachable_count: 1,
            unique_source_ip_count: 3,
            window_start: Duration::from_secs(100),
            closed_at: Duration::from_secs(160),
            flow_count: 6,
        }
    }

    #[test]
    fn test_vector_follows_declaration_order() {
        assert_eq!(
            snapshot().to_vector(),
            [0.5, 1.0, 1.5, 10.0, 2000.0, 4.0, 1.0, 3.0]
        );
    }

    #[test]
    fn test_feature_names_are_unique() {
        let mut names: Vec<_> = Feature::ALL.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&Feature::IcmpUnreachableCount).unwrap();
        assert_eq!(json, "\"icmp_unreachable_count\"");
        assert_eq!(Feature::IcmpUnreachableCount.to_string(), "icmp_unreachable_count");
    }

    #[test]
    fn test_window_duration() {
        assert_eq!(snapshot().window_duration(), Duration::from_secs(60));
    }
}
