//! Damped linear extrapolation of the risk score.

use chronos_config::ForecastConfig;
use chronos_core::ForecastPoint;

/// How far and how aggressively risk is projected forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPolicy {
    /// Number of projected points.
    pub horizon: usize,
    /// Multiplier on the last observed delta; `< 1` attenuates it.
    pub damping: f64,
    /// Spacing between points in whole seconds, normally the sampling
    /// interval.
    pub step_seconds: u64,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default(), 2_000)
    }
}

impl ForecastPolicy {
    /// `interval_ms` is rounded down to whole seconds, never below one, so
    /// every offset stays a distinct multiple of the step.
    pub fn from_config(cfg: &ForecastConfig, interval_ms: u64) -> Self {
        Self {
            horizon:      cfg.horizon,
            damping:      cfg.damping,
            step_seconds: (interval_ms / 1000).max(1),
        }
    }

    /// Project from a risk series; only its last two values matter.
    ///
    /// Yields nothing when fewer than two values are available.
    pub fn project(&self, risks: &[f64]) -> Forecast {
        match risks {
            [.., prev, last] => Forecast::new(*prev, *last, *self),
            _ => Forecast::empty(*self),
        }
    }
}

/// Lazily computed forecast sequence. Consumed once; ask again for a
/// fresh one.
#[derive(Debug)]
pub struct Forecast {
    last:   f64,
    trend:  f64,
    policy: ForecastPolicy,
    step:   usize,
    len:    usize,
}

impl Forecast {
    fn new(prev: f64, last: f64, policy: ForecastPolicy) -> Self {
        Self {
            last,
            trend: last - prev,
            policy,
            step: 0,
            len: policy.horizon,
        }
    }

    fn empty(policy: ForecastPolicy) -> Self {
        Self {
            last: 0.0,
            trend: 0.0,
            policy,
            step: 0,
            len: 0,
        }
    }

    /// Last minus previous observed risk.
    pub fn trend(&self) -> f64 {
        self.trend
    }
}

impl Iterator for Forecast {
    type Item = ForecastPoint;

    fn next(&mut self) -> Option<ForecastPoint> {
        if self.step >= self.len {
            return None;
        }
        self.step += 1;
        let i = self.step as f64;
        let projected = self.last + self.trend * i * self.policy.damping;
        Some(ForecastPoint {
            offset_seconds: self.step as u64 * self.policy.step_seconds,
            projected_risk: projected.clamp(0.0, 100.0),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Forecast {}
