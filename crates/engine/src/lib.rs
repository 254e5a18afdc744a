//! Streaming stability analytics.
//!
//! Samples flow `Engine::ingest` → [`HistoryBuffer`] → trend/volatility →
//! [`scorer`] → [`mood`] → [`RiskResult`](chronos_core::RiskResult). The
//! forecaster and spike detector read the same state without mutating it.

pub mod engine;
pub mod forecast;
pub mod history;
pub mod mood;
pub mod scorer;
pub mod spike;
pub mod trend;
pub mod volatility;
pub mod window;

pub use engine::{Engine, SharedEngine};
pub use forecast::{Forecast, ForecastPolicy};
pub use history::{HistoryBuffer, Metric, MAX_HISTORY};
pub use mood::classify;
pub use scorer::{score, Score};
pub use spike::{Reading, SpikeThresholds};
pub use window::MetricWindow;
