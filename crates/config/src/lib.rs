pub mod schema;
pub mod watcher;

pub use schema::{
    ChronosConfig, EngineConfig, ForecastConfig, LogConfig, SamplingConfig, SinkConfig,
    SourceKind, SpikeConfig, ViewConfig,
};
pub use watcher::ConfigWatcher;

use chronos_core::{ChronosError, Result};
use std::path::{Path, PathBuf};

/// Smallest history that still lets the 10-sample trend rules fire.
pub const MIN_HISTORY_CAPACITY: usize = 10;

/// Load configuration from a TOML file.  Returns `ChronosConfig::default()`
/// if the file doesn't exist so the daemon always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<ChronosConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(ChronosConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| ChronosError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: ChronosConfig =
        toml::from_str(&raw).map_err(|e| ChronosError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

/// Reject values the engine cannot run with.
pub fn validate(config: &ChronosConfig) -> Result<()> {
    let interval_ms = config.sampling.interval_ms;
    if interval_ms == 0 || interval_ms % 1000 != 0 {
        return Err(ChronosError::Config(format!(
            "sampling.interval_ms must be a positive whole number of seconds, got {interval_ms}"
        )));
    }
    if config.engine.history_capacity < MIN_HISTORY_CAPACITY {
        return Err(ChronosError::Config(format!(
            "engine.history_capacity must be at least {MIN_HISTORY_CAPACITY}, got {}",
            config.engine.history_capacity
        )));
    }
    if config.forecast.horizon == 0 {
        return Err(ChronosError::Config("forecast.horizon must be > 0".into()));
    }
    if !(0.0..=1.0).contains(&config.forecast.damping) {
        return Err(ChronosError::Config(format!(
            "forecast.damping must lie in [0, 1], got {}",
            config.forecast.damping
        )));
    }
    let spike = &config.spike;
    let deltas = [spike.cpu_delta, spike.memory_delta, spike.traffic_delta];
    if deltas.iter().any(|d| !d.is_finite() || *d < 0.0) {
        return Err(ChronosError::Config(
            "spike deltas must be finite and non-negative".into(),
        ));
    }
    if config.view.window == 0 {
        return Err(ChronosError::Config("view.window must be > 0".into()));
    }
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("chronos").join("chronos.toml")
}
