use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use flodvakt_config::{ConfigError, FlodvaktConfig};
use flodvakt_core::{
    AnomalyReport, DetectionError, EngineConfig, FeatureSnapshot, FlowRecord, SlidingWindowEngine,
};
use flodvakt_telemetry::{EventLogger, MetricsRecorder};

use crate::error::CliError;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Configuration file (default: config/flodvakt.yaml plus FLODVAKT_* overrides)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded flow scenario and print closed windows as JSON lines
    Replay(ReplayArgs),
    /// Print the effective configuration as YAML
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// YAML or JSON file holding a `flows` list
    pub scenario: PathBuf,
    /// Evaluate the anomaly report after every closed window instead of once at the end
    #[arg(long, default_value_t = false)]
    pub report_every_window: bool,
    /// Print prometheus metrics after the replay
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

/// Recorded flows to feed through the engine in order.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub flows: Vec<FlowRecord>,
}

impl Scenario {
    /// JSON when the extension is `.json`, YAML otherwise.
    pub fn load_from_file(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        Self::decode(&content, is_json).map_err(|reason| CliError::Scenario {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn decode(content: &str, is_json: bool) -> Result<Self, String> {
        if is_json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        }
    }
}

/// One line of replay output.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ReplayEvent<'a> {
    WindowClosed { snapshot: &'a FeatureSnapshot },
    AnomalyReport { report: &'a AnomalyReport },
    InsufficientHistory { available: usize },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub flows: usize,
    pub windows_closed: usize,
    /// Reports that flagged at least one feature.
    pub anomalous_reports: usize,
}

pub fn run_command(cli: Cli, config: &FlodvaktConfig) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Replay(args) => {
            let summary = run_replay(&args, config, &mut out)?;
            info!(
                flows = summary.flows,
                windows = summary.windows_closed,
                anomalous_reports = summary.anomalous_reports,
                "Replay complete"
            );
            Ok(())
        }
        Commands::Config => {
            let yaml = serde_yaml::to_string(config)
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
            out.write_all(yaml.as_bytes())?;
            Ok(())
        }
    }
}

#[instrument(level = "info", name = "replay", skip(config, out))]
pub fn run_replay<W: Write>(
    args: &ReplayArgs,
    config: &FlodvaktConfig,
    out: &mut W,
) -> Result<ReplaySummary, CliError> {
    let scenario = Scenario::load_from_file(&args.scenario)?;
    let metrics = MetricsRecorder::new()?;
    info!(flows = scenario.flows.len(), "Scenario loaded");

    let summary = replay_flows(
        &scenario.flows,
        config.engine_config()?,
        args.report_every_window,
        &metrics,
        out,
    )?;

    if args.metrics {
        out.write_all(metrics.gather_metrics()?.as_bytes())?;
    }
    Ok(summary)
}

/// Feeds `flows` through a fresh engine, writing one JSON line per closed
/// window and per anomaly report. The last line is always the end-of-replay
/// report.
pub fn replay_flows<W: Write>(
    flows: &[FlowRecord],
    engine_config: EngineConfig,
    report_every_window: bool,
    metrics: &MetricsRecorder,
    out: &mut W,
) -> Result<ReplaySummary, CliError> {
    let mut engine = SlidingWindowEngine::new(engine_config).map_err(ConfigError::from)?;
    let mut summary = ReplaySummary::default();

    for flow in flows {
        let started = Instant::now();
        let event = engine.ingest(flow);
        metrics
            .ingest_latency
            .observe(started.elapsed().as_nanos() as f64);
        metrics.flows_ingested.inc();
        summary.flows += 1;

        let Some(snapshot) = event.snapshot() else {
            continue;
        };
        summary.windows_closed += 1;
        metrics.window_record(snapshot);
        EventLogger::log_snapshot(snapshot);
        event_write(out, &ReplayEvent::WindowClosed { snapshot })?;

        if report_every_window && report_write(&engine, metrics, out)? {
            summary.anomalous_reports += 1;
        }
    }

    // final report is written even when every window already got one
    if report_write(&engine, metrics, out)? {
        summary.anomalous_reports += 1;
    }
    Ok(summary)
}

/// Writes the current anomaly report. Returns whether anything was flagged.
fn report_write<W: Write>(
    engine: &SlidingWindowEngine,
    metrics: &MetricsRecorder,
    out: &mut W,
) -> Result<bool, CliError> {
    match engine.detect_anomalies() {
        Ok(report) => {
            metrics.report_record(&report);
            EventLogger::log_report(&report);
            event_write(out, &ReplayEvent::AnomalyReport { report: &report })?;
            Ok(report.is_anomalous())
        }
        Err(DetectionError::InsufficientHistory { available }) => {
            debug!(available, "Not enough closed windows for a report yet");
            event_write(out, &ReplayEvent::InsufficientHistory { available })?;
            Ok(false)
        }
    }
}

fn event_write<W: Write>(out: &mut W, event: &ReplayEvent<'_>) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")?;
    Ok(())
}
