use serde::{Deserialize, Serialize};

/// One utilization reading handed to the engine per tick.
///
/// `cpu` and `memory` are percentages in `[0, 100]`; `traffic` and `load`
/// are non-negative and unbounded. Values outside those ranges are clamped
/// by [`Sample::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub cpu:       f64,
    pub memory:    f64,
    pub traffic:   f64,
    pub load:      f64,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

impl Sample {
    #[must_use]
    pub fn new(cpu: f64, memory: f64, traffic: f64, load: f64, timestamp: i64) -> Self {
        Self {
            cpu:     clamp_finite(cpu, 0.0, 100.0),
            memory:  clamp_finite(memory, 0.0, 100.0),
            traffic: clamp_finite(traffic, 0.0, f64::MAX),
            load:    clamp_finite(load, 0.0, f64::MAX),
            timestamp,
        }
    }
}

fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return lo;
    }
    value.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_percentages() {
        let s = Sample::new(120.0, -3.0, 10.0, 1.0, 0);
        assert_eq!(s.cpu, 100.0);
        assert_eq!(s.memory, 0.0);
    }

    #[test]
    fn new_rejects_negative_traffic_and_nan() {
        let s = Sample::new(10.0, 10.0, -5.0, f64::NAN, 0);
        assert_eq!(s.traffic, 0.0);
        assert_eq!(s.load, 0.0);
    }
}
