//! # flodvakt-core
//!
//! Streaming feature extraction over network flow records.
//!
//! Flows are fed one at a time into a [`SlidingWindowEngine`]. The engine aggregates
//! them into fixed-interval windows, and every time a window closes it emits a
//! [`FeatureSnapshot`] holding traffic totals and Shannon entropy of the source IP,
//! destination IP and packet size distributions. Closed snapshots are retained in a
//! time-bounded [`ComparisonHistory`] which can be queried for features that deviate
//! from their rolling baseline.
//!
//! ### Expectations:
//! - No I/O and no suspension points on the ingest path
//! - Memory bounded by one open window plus the configured comparison history
//! - Deterministic output for a given flow sequence
//!
//! ### Key Submodules:
//! - `entropy`: Shannon entropy over weighted distributions
//! - `window`: open window accumulation and feature computation
//! - `history`: retained snapshots and deviation-based anomaly detection
//! - `engine`: ingestion and window rollover
//! - `shared`: mutex-guarded engine handle for multi-source ingestion

pub mod engine;
pub mod entropy;
pub mod error;
pub mod flow;
pub mod history;
pub mod shared;
pub mod snapshot;
pub mod time;
pub mod window;

pub mod prelude {
    pub use crate::engine::*;
    pub use crate::error::*;
    pub use crate::flow::*;
    pub use crate::history::*;
    pub use crate::shared::*;
    pub use crate::snapshot::*;
}

pub use engine::{EngineConfig, SlidingWindowEngine, WindowEvent};
pub use error::{DetectionError, EngineError};
pub use flow::FlowRecord;
pub use history::{Anomaly, AnomalyReport, ComparisonHistory};
pub use shared::SharedEngine;
pub use snapshot::{Feature, FeatureSnapshot, FEATURE_COUNT};
pub use window::AggregationWindow;
