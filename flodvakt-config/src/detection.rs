//! Anomaly detection parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Relative deviation from the rolling mean that flags a feature (0.3 = 30%).
    #[validate(range(min = 0.0, max = 10.0))]
    #[serde(default = "default_deviation_threshold")]
    pub deviation_threshold: f64,
}

fn default_deviation_threshold() -> f64 {
    flodvakt_core::EngineConfig::DEFAULT_DEVIATION_THRESHOLD
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            deviation_threshold: default_deviation_threshold(),
        }
    }
}
