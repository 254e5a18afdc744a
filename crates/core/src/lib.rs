pub mod error;
pub mod sample;
pub mod signal;

pub use error::{ChronosError, Result};
pub use sample::Sample;
pub use signal::{round_to, ForecastPoint, MetricPoint, Mood, RiskResult};
