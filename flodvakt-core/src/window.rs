//! ## flodvakt-core::window
//! **Open window accumulation**
//!
//! Keeps running per-key counters instead of the raw flow list. Feature output
//! is identical to replaying the accumulated flows, and memory grows with the
//! number of distinct keys rather than the number of flows.

use std::net::IpAddr;
use std::time::Duration;

use crate::entropy::Distribution;
use crate::flow::FlowRecord;
use crate::snapshot::FeatureSnapshot;

/// Accumulation state for the currently open window.
#[derive(Debug, Clone, Default)]
pub struct AggregationWindow {
    earliest_time: Option<Duration>,
    current_time: Duration,

    source_ips: Distribution<IpAddr>,
    destination_ips: Distribution<IpAddr>,
    packet_sizes: Distribution<u32>,

    total_packets: u64,
    total_bytes: u64,
    syn_count: u64,
    icmp_unreachable_count: u64,
    flow_count: u64,
}

impl AggregationWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the timestamp of an incoming flow.
    ///
    /// The first timestamp after a reset becomes the window start. The latest
    /// timestamp always becomes `current_time`, even when it is older than the
    /// previous one.
    pub fn time_observe(&mut self, timestamp: Duration) {
        if self.earliest_time.is_none() {
            self.earliest_time = Some(timestamp);
        }
        self.current_time = timestamp;
    }

    /// Time between window start and the latest observed timestamp.
    ///
    /// Saturates at zero when an out-of-order timestamp precedes the window start.
    pub fn elapsed(&self) -> Duration {
        match self.earliest_time {
            Some(earliest) => self.current_time.saturating_sub(earliest),
            None => Duration::ZERO,
        }
    }

    /// Adds a flow's contribution to every distribution and total.
    pub fn flow_add(&mut self, flow: &FlowRecord) {
        let packets = flow.packet_count;

        self.source_ips.add(flow.source_ip, packets);
        self.destination_ips.add(flow.destination_ip, packets);
        self.packet_sizes.add(flow.packet_size, packets);

        self.total_packets = self.total_packets.saturating_add(packets);
        self.total_bytes = self.total_bytes.saturating_add(flow.byte_count);
        if flow.tcp_flags_syn {
            self.syn_count = self.syn_count.saturating_add(packets);
        }
        if flow.is_icmp_unreachable() {
            self.icmp_unreachable_count = self.icmp_unreachable_count.saturating_add(packets);
        }
        self.flow_count += 1;
    }

    /// Computes the feature snapshot for the flows accumulated so far.
    pub fn compute_features(&self) -> FeatureSnapshot {
        let total = self.total_packets;
        FeatureSnapshot {
            entropy_source_ip: self.source_ips.entropy(total),
            entropy_destination_ip: self.destination_ips.entropy(total),
            entropy_packet_size: self.packet_sizes.entropy(total),
            total_packets: total,
            total_bytes: self.total_bytes,
            syn_count: self.syn_count,
            icmp_unreachable_count: self.icmp_unreachable_count,
            unique_source_ip_count: self.source_ips.distinct() as u64,
            window_start: self.earliest_time.unwrap_or(self.current_time),
            closed_at: self.current_time,
            flow_count: self.flow_count,
        }
    }

    /// Clears all accumulated state and starts a new window at `start`.
    pub fn reset_at(&mut self, start: Duration) {
        self.source_ips.clear();
        self.destination_ips.clear();
        self.packet_sizes.clear();
        self.total_packets = 0;
        self.total_bytes = 0;
        self.syn_count = 0;
        self.icmp_unreachable_count = 0;
        self.flow_count = 0;
        self.earliest_time = Some(start);
        self.current_time = start;
    }

    pub fn earliest_time(&self) -> Option<Duration> {
        self.earliest_time
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    pub fn flow_count(&self) -> u64 {
        self.flow_count
    }

    pub fn is_empty(&self) -> bool {
        self.flow_count == 0
    }
}
