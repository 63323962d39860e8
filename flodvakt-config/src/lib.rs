//! # flodvakt Configuration
//!
//! Hierarchical configuration for the flow feature engine.
//!
//! ## Sources (later wins)
//! 1. Default values
//! 2. `config/flodvakt.yaml`
//! 3. `config/<FLODVAKT_ENV>.yaml` (defaults to `production`)
//! 4. `FLODVAKT_*` environment variables, `__` separating nested keys
//!    (`FLODVAKT_WINDOW__SLIDING_WINDOW_SECS=60`)

#![deny(rustdoc::broken_intra_doc_links)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use flodvakt_core::EngineConfig;

mod detection;
mod error;
mod telemetry;
mod validation;
mod window;

pub use detection::DetectionConfig;
pub use error::ConfigError;
pub use telemetry::TelemetryConfig;
pub use window::WindowConfig;

const BASE_FILE: &str = "config/flodvakt.yaml";
const ENV_PREFIX: &str = "FLODVAKT_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct FlodvaktConfig {
    /// Window timing.
    #[validate(nested)]
    #[serde(default)]
    pub window: WindowConfig,

    /// Anomaly detection thresholds.
    #[validate(nested)]
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Logging.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl FlodvaktConfig {
    /// Load configuration from default files and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(FlodvaktConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("FLODVAKT_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file, still honoring environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound(PathBuf::from(path)),
            _ => ConfigError::Io(e),
        })?;

        Self::extract(
            Figment::from(Serialized::defaults(FlodvaktConfig::default()))
                .merge(Yaml::string(&content))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Engine parameters derived from the window and detection sections.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig::new(
            Duration::from_secs(self.window.sliding_window_secs),
            Duration::from_secs(self.window.aggregate_window_secs),
            Duration::from_secs(self.window.comparison_window_secs),
        )?
        .with_deviation_threshold(self.detection.deviation_threshold)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn full_config_validation() {
        let config = FlodvaktConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn default_engine_config() {
        let engine = FlodvaktConfig::default().engine_config().unwrap();
        assert_eq!(engine, EngineConfig::default());
    }

    #[test]
    fn base_file_and_environment_override() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/flodvakt.yaml",
                "window:\n  sliding_window_secs: 60\n  comparison_window_secs: 600\n",
            )?;
            jail.set_env("FLODVAKT_DETECTION__DEVIATION_THRESHOLD", "0.5");

            let config = FlodvaktConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.window.sliding_window_secs, 60);
            assert_eq!(config.window.comparison_window_secs, 600);
            assert_eq!(config.window.aggregate_window_secs, 6000);
            assert_eq!(config.detection.deviation_threshold, 0.5);

            let engine = config.engine_config().map_err(|e| e.to_string())?;
            assert_eq!(engine.sliding_window_interval, Duration::from_secs(60));
            Ok(())
        });
    }

    #[test]
    fn environment_file_overrides_base() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/flodvakt.yaml", "telemetry:\n  log_level: debug\n")?;
            jail.create_file("config/staging.yaml", "telemetry:\n  json_logs: true\n")?;
            jail.set_env("FLODVAKT_ENV", "staging");

            let config = FlodvaktConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.telemetry.log_level, "debug");
            assert!(config.telemetry.json_logs);
            Ok(())
        });
    }

    #[test]
    fn invalid_file_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bad.yaml",
                "window:\n  sliding_window_secs: 600\n  comparison_window_secs: 60\n",
            )?;
            let result = FlodvaktConfig::load_from_path("bad.yaml");
            assert!(matches!(result, Err(ConfigError::Validation(_))));
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_reported() {
        let result = FlodvaktConfig::load_from_path("does/not/exist.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn unreadable_path_is_io_error() {
        Jail::expect_with(|jail| {
            jail.create_dir("not_a_file")?;
            let result = FlodvaktConfig::load_from_path("not_a_file");
            assert!(matches!(result, Err(ConfigError::Io(_))));
            Ok(())
        });
    }

    #[test]
    fn serializes_to_yaml() {
        let yaml = serde_yaml::to_string(&FlodvaktConfig::default()).unwrap();
        assert!(yaml.contains("sliding_window_secs: 1200"));
        assert!(yaml.contains("deviation_threshold: 0.3"));
    }
}
