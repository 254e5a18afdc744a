//! Pairwise spike detection between consecutive points.

use chronos_config::SpikeConfig;
use chronos_core::{MetricPoint, RiskResult, Sample};

/// Anything carrying the three metrics the spike check compares.
pub trait Reading {
    fn cpu(&self) -> f64;
    fn memory(&self) -> f64;
    fn traffic(&self) -> f64;
}

impl Reading for Sample {
    fn cpu(&self) -> f64 { self.cpu }
    fn memory(&self) -> f64 { self.memory }
    fn traffic(&self) -> f64 { self.traffic }
}

impl Reading for RiskResult {
    fn cpu(&self) -> f64 { self.cpu }
    fn memory(&self) -> f64 { self.memory }
    fn traffic(&self) -> f64 { self.traffic }
}

impl Reading for MetricPoint {
    fn cpu(&self) -> f64 { self.cpu }
    fn memory(&self) -> f64 { self.memory }
    fn traffic(&self) -> f64 { self.traffic }
}

/// Absolute deltas that must be exceeded for a spike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeThresholds {
    pub cpu:     f64,
    pub memory:  f64,
    pub traffic: f64,
}

impl Default for SpikeThresholds {
    fn default() -> Self {
        Self::from(&SpikeConfig::default())
    }
}

impl From<&SpikeConfig> for SpikeThresholds {
    fn from(cfg: &SpikeConfig) -> Self {
        Self {
            cpu:     cfg.cpu_delta,
            memory:  cfg.memory_delta,
            traffic: cfg.traffic_delta,
        }
    }
}

impl SpikeThresholds {
    /// `true` when any metric moved by more than its threshold since
    /// `previous`. A point with no predecessor is never a spike.
    pub fn is_spike<P, C>(&self, previous: Option<&P>, current: &C) -> bool
    where
        P: Reading + ?Sized,
        C: Reading + ?Sized,
    {
        let Some(previous) = previous else {
            return false;
        };
        (current.cpu() - previous.cpu()).abs() > self.cpu
            || (current.memory() - previous.memory()).abs() > self.memory
            || (current.traffic() - previous.traffic()).abs() > self.traffic
    }
}
