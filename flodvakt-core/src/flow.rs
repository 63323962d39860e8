//! Normalized network flow records.

use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// ICMP type for "destination unreachable".
pub const ICMP_DEST_UNREACHABLE: u8 = 3;

/// One observed network flow.
///
/// Addresses are only used as distribution keys and are never interpreted.
/// Counts are unsigned; a flow with `packet_count == 0` still counts as observed
/// but adds no weight to any distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    /// Observation time since the Unix epoch.
    #[serde(with = "crate::time::secs")]
    pub timestamp: Duration,

    pub source_ip: IpAddr,
    pub destination_ip: IpAddr,

    #[serde(default)]
    pub source_port: u16,
    #[serde(default)]
    pub destination_port: u16,

    /// IANA protocol number (6 = TCP, 17 = UDP, 1 = ICMP).
    #[serde(default)]
    pub protocol: u8,

    #[serde(default)]
    pub packet_size: u32,
    #[serde(default)]
    pub packet_count: u64,
    #[serde(default)]
    pub byte_count: u64,

    #[serde(default)]
    pub tcp_flags_syn: bool,
    #[serde(default)]
    pub icmp_type: Option<u8>,
}

impl FlowRecord {
    /// Creates a single-packet flow with empty counters and no flags.
    pub fn new(timestamp: Duration, source_ip: IpAddr, destination_ip: IpAddr) -> Self {
        Self {
            timestamp,
            source_ip,
            destination_ip,
            source_port: 0,
            destination_port: 0,
            protocol: 0,
            packet_size: 0,
            packet_count: 1,
            byte_count: 0,
            tcp_flags_syn: false,
            icmp_type: None,
        }
    }

    pub fn with_packets(mut self, packet_count: u64, byte_count: u64) -> Self {
        self.packet_count = packet_count;
        self.byte_count = byte_count;
        self
    }

    pub fn with_packet_size(mut self, packet_size: u32) -> Self {
        self.packet_size = packet_size;
        self
    }

    pub fn with_ports(mut self, source_port: u16, destination_port: u16) -> Self {
        self.source_port = source_port;
        self.destination_port = destination_port;
        self
    }

    pub fn with_protocol(mut self, protocol: u8) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_syn(mut self, syn: bool) -> Self {
        self.tcp_flags_syn = syn;
        self
    }

    pub fn with_icmp_type(mut self, icmp_type: u8) -> Self {
        self.icmp_type = Some(icmp_type);
        self
    }

    #[inline]
    pub fn is_icmp_unreachable(&self) -> bool {
        self.icmp_type == Some(ICMP_DEST_UNREACHABLE)
    }
}
