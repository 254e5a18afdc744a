//! Least-squares slope over a window of one metric.
//!
//! Slopes are in value-per-sample-index, the same unit for every metric,
//! so a CPU trend and a traffic trend are directly comparable to their
//! own thresholds.

use crate::history::{HistoryBuffer, Metric};

/// Fewer points than this carry no trend.
pub const MIN_TREND_POINTS: usize = 3;

/// Ordinary least-squares slope of `values` against their index `0..n`.
///
/// Returns `0.0` for fewer than [`MIN_TREND_POINTS`] values.
pub fn slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < MIN_TREND_POINTS {
        return 0.0;
    }

    let n_f = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n_f * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n_f * sum_xy - sum_x * sum_y) / denominator
}

/// Slope of `metric` over the last `window` samples of `history`.
pub fn metric_trend(history: &HistoryBuffer, metric: Metric, window: usize) -> f64 {
    slope(&history.series(metric, window))
}
