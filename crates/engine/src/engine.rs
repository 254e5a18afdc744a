use crate::forecast::{Forecast, ForecastPolicy};
use crate::history::{HistoryBuffer, MAX_HISTORY};
use crate::mood::classify;
use crate::scorer::score;
use crate::spike::SpikeThresholds;
use chronos_config::ChronosConfig;
use chronos_core::{Mood, RiskResult, Sample};
use parking_lot::RwLock;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Per-stream analytics state: sample history plus the risk trail the
/// forecaster extrapolates from.
///
/// `ingest` is the only mutating operation. Everything else is a pure read
/// of the current buffer.
#[derive(Debug, Clone)]
pub struct Engine {
    history:    HistoryBuffer,
    /// Risk of each retained sample, evicted in lockstep with `history`.
    risk_trail: VecDeque<f64>,
    forecast:   ForecastPolicy,
    spike:      SpikeThresholds,
    last_mood:  Option<Mood>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let history = HistoryBuffer::new(capacity);
        Self {
            risk_trail: VecDeque::with_capacity(history.capacity()),
            history,
            forecast:   ForecastPolicy::default(),
            spike:      SpikeThresholds::default(),
            last_mood:  None,
        }
    }

    pub fn from_config(config: &ChronosConfig) -> Self {
        let mut engine = Self::with_capacity(config.engine.history_capacity);
        engine.apply_config(config);
        engine
    }

    /// Adopt the reloadable parts of `config`. History capacity is fixed
    /// for the lifetime of the engine.
    pub fn apply_config(&mut self, config: &ChronosConfig) {
        self.forecast = ForecastPolicy::from_config(&config.forecast, config.sampling.interval_ms);
        self.spike = SpikeThresholds::from(&config.spike);
    }

    pub fn set_forecast_policy(&mut self, policy: ForecastPolicy) {
        self.forecast = policy;
    }

    pub fn set_spike_thresholds(&mut self, thresholds: SpikeThresholds) {
        self.spike = thresholds;
    }

    /// Append `sample` and derive its risk, mood and reasons.
    pub fn ingest(&mut self, sample: Sample) -> RiskResult {
        self.history.append(sample);
        let scored = score(&sample, &self.history);
        let mood = classify(scored.risk);
        let result = RiskResult::compose(&sample, scored.risk, mood, scored.reasons);

        if self.risk_trail.len() == self.history.capacity() {
            self.risk_trail.pop_front();
        }
        self.risk_trail.push_back(result.risk);

        debug!(
            risk = result.risk,
            raw = scored.raw,
            mood = %mood,
            "scored sample at {}",
            sample.timestamp
        );
        if let Some(previous) = self.last_mood.replace(mood) {
            if previous != mood {
                info!("System mood {previous} -> {mood} (risk {:.1})", result.risk);
            }
        }

        result
    }

    /// Fresh forecast from the two most recent risk values.
    pub fn forecast(&self) -> Forecast {
        let start = self.risk_trail.len().saturating_sub(2);
        let tail: Vec<f64> = self.risk_trail.range(start..).copied().collect();
        self.forecast.project(&tail)
    }

    /// Whether the latest sample spiked relative to the one before it.
    pub fn spike_check(&self) -> bool {
        match self.history.latest() {
            Some(latest) => self.spike.is_spike(self.history.previous(), latest),
            None => false,
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Risk scores of the retained samples, oldest first.
    pub fn risk_trail(&self) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        self.risk_trail.iter().copied()
    }

    pub fn forecast_policy(&self) -> ForecastPolicy {
        self.forecast
    }

    pub fn spike_thresholds(&self) -> SpikeThresholds {
        self.spike
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// An [`Engine`] that can be shared across tasks.
///
/// Ingest holds the write lock for the whole append-and-score step, so
/// concurrent readers see either the state before a sample or after it.
#[derive(Debug, Default)]
pub struct SharedEngine {
    inner: RwLock<Engine>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: RwLock::new(engine),
        }
    }

    pub fn ingest(&self, sample: Sample) -> RiskResult {
        self.inner.write().ingest(sample)
    }

    pub fn forecast(&self) -> Vec<chronos_core::ForecastPoint> {
        self.inner.read().forecast().collect()
    }

    pub fn spike_check(&self) -> bool {
        self.inner.read().spike_check()
    }

    pub fn apply_config(&self, config: &ChronosConfig) {
        self.inner.write().apply_config(config);
    }

    /// A consistent copy of the current history.
    pub fn snapshot(&self) -> HistoryBuffer {
        self.inner.read().history().clone()
    }

    /// Run `f` against the engine under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        f(&*self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample(cpu: f64, memory: f64, traffic: f64, load: f64, ts: i64) -> Sample {
        Sample::new(cpu, memory, traffic, load, ts)
    }

    #[test]
    fn critical_cpu_on_fresh_engine() {
        let mut engine = Engine::new();
        let result = engine.ingest(sample(85.0, 50.0, 200.0, 1.0, 1));
        assert_eq!(result.risk, 30.0);
        assert_eq!(result.mood, Mood::Calm);
        assert_eq!(result.reasons, vec!["Critical CPU usage detected".to_string()]);
    }

    #[test]
    fn saturated_risk_panics() {
        let mut engine = Engine::new();
        let result = engine.ingest(sample(90.0, 90.0, 1200.0, 5.0, 1));
        assert_eq!(result.risk, 100.0);
        assert_eq!(result.mood, Mood::Panic);
    }

    #[test]
    fn quiet_sample_reports_normal_operation() {
        let mut engine = Engine::new();
        let result = engine.ingest(sample(20.0, 30.0, 100.0, 0.5, 1));
        assert_eq!(result.risk, 0.0);
        assert_eq!(result.reasons, vec!["System operating normally".to_string()]);
    }

    #[test]
    fn risk_and_mood_stay_consistent_over_a_long_stream() {
        let mut engine = Engine::new();
        for i in 0..500i64 {
            let f = i as f64;
            let cpu = 50.0 + 45.0 * (f / 7.0).sin();
            let memory = 55.0 + 40.0 * (f / 11.0).cos();
            let traffic = 600.0 + 550.0 * (f / 5.0).sin();
            let load = 2.5 + 2.4 * (f / 3.0).cos();
            let result = engine.ingest(sample(cpu, memory, traffic, load, i));
            assert!((0.0..=100.0).contains(&result.risk));
            assert_eq!(result.mood, classify(result.risk));
            assert!(!result.reasons.is_empty());
        }
        assert_eq!(engine.history().len(), MAX_HISTORY);
        assert_eq!(engine.risk_trail().len(), MAX_HISTORY);
    }

    #[test]
    fn forecast_uses_last_two_risks() {
        let mut engine = Engine::new();
        assert_eq!(engine.forecast().count(), 0);

        engine.ingest(sample(20.0, 30.0, 100.0, 0.5, 1)); // 0
        assert_eq!(engine.forecast().count(), 0);

        engine.ingest(sample(61.0, 30.0, 100.0, 0.5, 2)); // 15
        let risks: Vec<f64> = engine.forecast().map(|p| p.projected_risk).collect();
        assert_eq!(risks, vec![27.0, 39.0, 51.0, 63.0, 75.0]);
    }

    #[test]
    fn forecast_and_spike_check_are_idempotent() {
        let mut engine = Engine::new();
        engine.ingest(sample(50.0, 30.0, 100.0, 0.5, 1));
        engine.ingest(sample(66.0, 30.0, 100.0, 0.5, 2));

        let first: Vec<_> = engine.forecast().collect();
        let second: Vec<_> = engine.forecast().collect();
        assert_eq!(first, second);
        assert!(engine.spike_check());
        assert!(engine.spike_check());
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn spike_check_compares_latest_pair() {
        let mut engine = Engine::new();
        assert!(!engine.spike_check());
        engine.ingest(sample(50.0, 30.0, 100.0, 0.5, 1));
        assert!(!engine.spike_check());
        engine.ingest(sample(64.0, 30.0, 100.0, 0.5, 2));
        assert!(!engine.spike_check());
        engine.ingest(sample(64.0, 30.0, 301.0, 0.5, 3));
        assert!(engine.spike_check());
    }

    #[test]
    fn independent_streams_do_not_share_state() {
        let mut a = Engine::new();
        let mut b = Engine::new();
        for i in 0..10 {
            a.ingest(sample(10.0 + 5.0 * i as f64, 30.0, 100.0, 0.5, i));
        }
        let quiet = b.ingest(sample(55.0, 30.0, 100.0, 0.5, 10));
        assert_eq!(b.history().len(), 1);
        assert_eq!(quiet.risk, 0.0);
    }

    #[test]
    fn config_reload_changes_policy_not_capacity() {
        let mut config = ChronosConfig::default();
        config.engine.history_capacity = 20;
        let mut engine = Engine::from_config(&config);

        config.engine.history_capacity = 99;
        config.forecast.horizon = 2;
        config.sampling.interval_ms = 1_000;
        engine.apply_config(&config);

        assert_eq!(engine.history().capacity(), 20);
        assert_eq!(engine.forecast_policy().horizon, 2);
        assert_eq!(engine.forecast_policy().step_seconds, 1);
    }

    #[test]
    fn shared_engine_serializes_ingest() {
        let shared = Arc::new(SharedEngine::default());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        shared.ingest(sample(30.0, 30.0, 100.0, 0.5, t * 100 + i));
                        let _ = shared.forecast();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.len(), 50);
        shared.read(|engine| assert_eq!(engine.risk_trail().len(), 50));
    }
}
