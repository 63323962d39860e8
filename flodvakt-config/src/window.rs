//! Sliding window timing.
//!
//! All durations are whole seconds.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = validation::validate_window_ordering))]
pub struct WindowConfig {
    /// How often a window closes.
    #[validate(range(min = 1, max = 86400))]
    #[serde(default = "default_sliding")]
    pub sliding_window_secs: u64,

    /// Aggregate window length, carried for downstream consumers.
    #[validate(range(min = 1, max = 604800))]
    #[serde(default = "default_aggregate")]
    pub aggregate_window_secs: u64,

    /// Snapshot history retained for anomaly comparison.
    #[validate(range(min = 1, max = 2592000))]
    #[serde(default = "default_comparison")]
    pub comparison_window_secs: u64,
}

fn default_sliding() -> u64 {
    1200
}
fn default_aggregate() -> u64 {
    6000
}
fn default_comparison() -> u64 {
    12000
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            sliding_window_secs: default_sliding(),
            aggregate_window_secs: default_aggregate(),
            comparison_window_secs: default_comparison(),
        }
    }
}
