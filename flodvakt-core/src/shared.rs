//! ## flodvakt-core::shared
//! **Mutex-guarded engine for multi-source ingestion**
//!
//! Window closure must observe a consistent flow set, so every source
//! serializes through one lock. `ingest` holds the lock for a single state
//! transition and never blocks on I/O.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::{SlidingWindowEngine, WindowEvent};
use crate::error::DetectionError;
use crate::flow::FlowRecord;
use crate::history::AnomalyReport;
use crate::snapshot::FeatureSnapshot;

/// Cloneable handle to one shared [`SlidingWindowEngine`].
#[derive(Clone, Debug)]
pub struct SharedEngine {
    inner: Arc<Mutex<SlidingWindowEngine>>,
}

impl SharedEngine {
    pub fn new(engine: SlidingWindowEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    #[inline]
    pub fn ingest(&self, flow: &FlowRecord) -> WindowEvent {
        self.inner.lock().ingest(flow)
    }

    pub fn detect_anomalies(&self) -> Result<AnomalyReport, DetectionError> {
        self.inner.lock().detect_anomalies()
    }

    pub fn latest_snapshot(&self) -> Option<FeatureSnapshot> {
        self.inner.lock().latest_snapshot().cloned()
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut SlidingWindowEngine) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<SlidingWindowEngine> for SharedEngine {
    fn from(engine: SlidingWindowEngine) -> Self {
        Self::new(engine)
    }
}
