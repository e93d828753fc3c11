//! Configuration types for pnl-replay

use crate::clock::DEFAULT_EPOCH;
use crate::telemetry::LogFormat;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Virtual clock configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Simulated seconds per real second (3600 replays an hour per second)
    #[serde(default = "default_acceleration")]
    pub acceleration: f64,

    /// Simulated instant the clock starts at
    #[serde(default = "default_epoch")]
    pub epoch: DateTime<Utc>,
}

fn default_acceleration() -> f64 {
    3600.0
}
fn default_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(DEFAULT_EPOCH, 0).unwrap_or_default()
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            acceleration: default_acceleration(),
            epoch: default_epoch(),
        }
    }
}

/// What the loops do once their feed runs dry
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMode {
    /// Sleep and poll the feed again, forever
    #[default]
    Production,
    /// Stop the loop; the run ends once the price feed is consumed
    Bounded,
}

/// Replay loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub mode: ReplayMode,

    /// Real seconds to sleep when a feed is exhausted in production mode
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,

    /// Real milliseconds to wait before re-checking a record that is not due yet
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_retry_backoff_secs() -> u64 {
    5
}
fn default_poll_interval_ms() -> u64 {
    1
}

impl ReplayConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            mode: ReplayMode::Production,
            retry_backoff_secs: default_retry_backoff_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the replay cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let acceleration = self.clock.acceleration;
        if !acceleration.is_finite() || acceleration <= 0.0 {
            anyhow::bail!(
                "clock.acceleration must be a positive number, got {}",
                acceleration
            );
        }
        Ok(())
    }
}
