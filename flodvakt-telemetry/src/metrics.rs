//! ## flodvakt-telemetry::metrics
//! **Prometheus counters and histograms for the ingest loop**

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use flodvakt_core::{AnomalyReport, FeatureSnapshot};

pub use prometheus::Error as MetricsError;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub flows_ingested: IntCounter,
    pub windows_closed: IntCounter,
    pub anomalies_flagged: IntCounterVec,
    pub window_packets: IntGauge,
    pub ingest_latency: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let flows_ingested =
            IntCounter::new("flodvakt_flows_ingested_total", "Total flow records ingested")?;
        let windows_closed =
            IntCounter::new("flodvakt_windows_closed_total", "Total windows closed")?;
        let anomalies_flagged = IntCounterVec::new(
            Opts::new(
                "flodvakt_anomalies_flagged_total",
                "Features flagged as anomalous, by feature",
            ),
            &["feature"],
        )?;
        let window_packets = IntGauge::new(
            "flodvakt_last_window_packets",
            "Total packets in the most recently closed window",
        )?;
        let ingest_latency = Histogram::with_opts(
            HistogramOpts::new("flodvakt_ingest_latency_ns", "Time spent in a single ingest call")
                .buckets(vec![100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0]),
        )?;

        registry.register(Box::new(flows_ingested.clone()))?;
        registry.register(Box::new(windows_closed.clone()))?;
        registry.register(Box::new(anomalies_flagged.clone()))?;
        registry.register(Box::new(window_packets.clone()))?;
        registry.register(Box::new(ingest_latency.clone()))?;

        Ok(Self {
            registry,
            flows_ingested,
            windows_closed,
            anomalies_flagged,
            window_packets,
            ingest_latency,
        })
    }

    pub fn window_record(&self, snapshot: &FeatureSnapshot) {
        self.windows_closed.inc();
        self.window_packets
            .set(i64::try_from(snapshot.total_packets).unwrap_or(i64::MAX));
    }

    pub fn report_record(&self, report: &AnomalyReport) {
        for anomaly in report.anomalies() {
            self.anomalies_flagged
                .with_label_values(&[anomaly.feature.name()])
                .inc();
        }
    }

    pub fn gather_metrics(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
