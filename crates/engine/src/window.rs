use crate::forecast::{Forecast, ForecastPolicy};
use crate::spike::SpikeThresholds;
use chronos_core::{MetricPoint, RiskResult};
use std::collections::VecDeque;

/// Default number of points a chart keeps.
pub const DEFAULT_VIEW_WINDOW: usize = 30;

/// Risk delta above which the trend reads as rising.
pub const RISING_DELTA: f64 = 0.5;

/// Rolling, chart-oriented view of delivered results.
///
/// Each pushed result is tagged with a spike flag against the point before
/// it. A failed fetch on the consumer side simply means no push, so the
/// last good points remain on display.
#[derive(Debug, Clone)]
pub struct MetricWindow {
    points:   VecDeque<MetricPoint>,
    capacity: usize,
    spike:    SpikeThresholds,
}

impl MetricWindow {
    pub fn new(capacity: usize, spike: SpikeThresholds) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            spike,
        }
    }

    pub fn push(&mut self, result: &RiskResult) -> MetricPoint {
        let is_spike = self.spike.is_spike(self.points.back(), result);
        let point = MetricPoint::from_result(result, is_spike);
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
        point
    }

    pub fn set_spike_thresholds(&mut self, spike: SpikeThresholds) {
        self.spike = spike;
    }

    pub fn forecast(&self, policy: &ForecastPolicy) -> Forecast {
        let start = self.points.len().saturating_sub(2);
        let tail: Vec<f64> = self.points.range(start..).map(|p| p.failure_risk).collect();
        policy.project(&tail)
    }

    pub fn spike_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_spike).count()
    }

    /// Latest minus previous risk; `0.0` with fewer than two points.
    pub fn risk_delta(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        self.points[n - 1].failure_risk - self.points[n - 2].failure_risk
    }

    pub fn is_rising(&self) -> bool {
        self.risk_delta() > RISING_DELTA
    }

    pub fn latest(&self) -> Option<&MetricPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MetricPoint> + ExactSizeIterator {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for MetricWindow {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_WINDOW, SpikeThresholds::default())
    }
}
