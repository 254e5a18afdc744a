use crate::history::{HistoryBuffer, Metric};

/// Samples the volatility rule looks back over.
pub const VOLATILITY_WINDOW: usize = 5;

/// Mean absolute successive change of `values`; `0.0` for fewer than two.
pub fn mean_abs_change(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let total: f64 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    total / (values.len() - 1) as f64
}

/// CPU volatility over the last [`VOLATILITY_WINDOW`] samples.
///
/// Returns `0.0` until the buffer holds a full window.
pub fn cpu_volatility(history: &HistoryBuffer) -> f64 {
    if history.len() < VOLATILITY_WINDOW {
        return 0.0;
    }
    mean_abs_change(&history.series(Metric::Cpu, VOLATILITY_WINDOW))
}
