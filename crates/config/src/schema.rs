use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `chronos.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChronosConfig {
    pub sampling: SamplingConfig,
    pub engine:   EngineConfig,
    pub forecast: ForecastConfig,
    pub spike:    SpikeConfig,
    pub view:     ViewConfig,
    pub sink:     SinkConfig,
    pub log:      LogConfig,
}

/// How and how often samples are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Tick interval in milliseconds.
    pub interval_ms: u64,
    pub source:      SourceKind,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            source:      SourceKind::System,
        }
    }
}

/// Which sample producer the daemon runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Live host readings via `sysinfo`.
    #[default]
    System,
    /// Seeded demo generator.
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples retained per stream.
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { history_capacity: 50 }
    }
}

/// Forecast policy: how far ahead and how strongly the last delta is damped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon: usize,
    pub damping: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 5,
            damping: 0.8,
        }
    }
}

/// Pairwise deltas above which a point counts as a spike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeConfig {
    pub cpu_delta:     f64,
    pub memory_delta:  f64,
    pub traffic_delta: f64,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            cpu_delta:     15.0,
            memory_delta:  15.0,
            traffic_delta: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Points kept in the rolling chart window.
    pub window: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { window: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SinkConfig {
    /// JSON-lines archive. `None` disables persistence.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
