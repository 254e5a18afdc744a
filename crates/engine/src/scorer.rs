//! Rule-based failure-risk scoring.
//!
//! The score is the sum of every tier's contribution, clamped to `[0, 100]`
//! once at the end. Within a tier only the first matching rule counts, so
//! the critical band shadows the elevated band of the same metric.

use crate::history::{HistoryBuffer, Metric};
use crate::trend::metric_trend;
use crate::volatility::{cpu_volatility, VOLATILITY_WINDOW};
use chronos_core::Sample;

/// Samples the trend rules look back over (and require before firing).
pub const TREND_WINDOW: usize = 10;

pub const MAX_RISK: f64 = 100.0;

/// Reason reported when no rule fires.
pub const NOMINAL_REASON: &str = "System operating normally";

/// A scalar the rules can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Cpu,
    Memory,
    Traffic,
    Load,
    CpuTrend,
    MemoryTrend,
    TrafficTrend,
    CpuVolatility,
}

/// `signal > threshold` ⇒ `+points`, reported as `reason`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub signal:    Signal,
    pub threshold: f64,
    pub points:    f64,
    pub reason:    &'static str,
}

impl Rule {
    const fn above(signal: Signal, threshold: f64, points: f64, reason: &'static str) -> Self {
        Self { signal, threshold, points, reason }
    }

    pub fn fires(&self, signals: &Signals) -> bool {
        signals
            .get(self.signal)
            .is_some_and(|value| value > self.threshold)
    }
}

/// Mutually exclusive bands of one metric, highest first.
#[derive(Debug, Clone, Copy)]
pub struct Tier {
    pub rules: &'static [Rule],
}

impl Tier {
    pub fn evaluate(&self, signals: &Signals) -> Option<&'static Rule> {
        self.rules.iter().find(|rule| rule.fires(signals))
    }
}

/// The scoring table, in evaluation order.
pub static TIERS: &[Tier] = &[
    Tier { rules: &[
        Rule::above(Signal::Cpu, 80.0, 30.0, "Critical CPU usage detected"),
        Rule::above(Signal::Cpu, 60.0, 15.0, "Elevated CPU usage"),
    ]},
    Tier { rules: &[
        Rule::above(Signal::Memory, 85.0, 35.0, "Critical memory pressure"),
        Rule::above(Signal::Memory, 70.0, 20.0, "High memory consumption"),
    ]},
    Tier { rules: &[
        Rule::above(Signal::Traffic, 1000.0, 18.0, "High traffic spike detected"),
        Rule::above(Signal::Traffic, 800.0, 8.0, "Elevated traffic levels"),
    ]},
    Tier { rules: &[
        Rule::above(Signal::Load, 4.0, 20.0, "Critical system load"),
        Rule::above(Signal::Load, 3.0, 10.0, "High system load"),
    ]},
    Tier { rules: &[
        Rule::above(Signal::CpuTrend, 2.0, 20.0, "Rapidly increasing CPU trend"),
        Rule::above(Signal::CpuTrend, 1.0, 10.0, "Rising CPU trend detected"),
    ]},
    Tier { rules: &[
        Rule::above(Signal::MemoryTrend, 1.5, 25.0, "Memory leak pattern detected"),
        Rule::above(Signal::MemoryTrend, 0.8, 12.0, "Growing memory usage"),
    ]},
    Tier { rules: &[
        Rule::above(Signal::TrafficTrend, 50.0, 15.0, "Rapidly increasing traffic"),
    ]},
    Tier { rules: &[
        Rule::above(Signal::CpuVolatility, 15.0, 15.0, "High system volatility"),
    ]},
];

/// Everything the rules read, computed once per score.
///
/// History-derived signals are `None` until the buffer is long enough for
/// the rule that reads them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub sample:         Sample,
    pub cpu_trend:      Option<f64>,
    pub memory_trend:   Option<f64>,
    pub traffic_trend:  Option<f64>,
    pub cpu_volatility: Option<f64>,
}

impl Signals {
    pub fn gather(sample: &Sample, history: &HistoryBuffer) -> Self {
        let trend = |metric: Metric| {
            (history.len() >= TREND_WINDOW).then(|| metric_trend(history, metric, TREND_WINDOW))
        };
        Self {
            sample:         *sample,
            cpu_trend:      trend(Metric::Cpu),
            memory_trend:   trend(Metric::Memory),
            traffic_trend:  trend(Metric::Traffic),
            cpu_volatility: (history.len() >= VOLATILITY_WINDOW).then(|| cpu_volatility(history)),
        }
    }

    pub fn get(&self, signal: Signal) -> Option<f64> {
        match signal {
            Signal::Cpu           => Some(self.sample.cpu),
            Signal::Memory        => Some(self.sample.memory),
            Signal::Traffic       => Some(self.sample.traffic),
            Signal::Load          => Some(self.sample.load),
            Signal::CpuTrend      => self.cpu_trend,
            Signal::MemoryTrend   => self.memory_trend,
            Signal::TrafficTrend  => self.traffic_trend,
            Signal::CpuVolatility => self.cpu_volatility,
        }
    }
}

/// Outcome of one scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Clamped to `[0, 100]`.
    pub risk:    f64,
    /// Sum of contributions before clamping.
    pub raw:     f64,
    pub reasons: Vec<String>,
}

/// Score `sample` against `history`.
///
/// `history` is expected to already contain `sample` as its latest entry
/// when the caller wants trend and volatility rules to see it.
pub fn score(sample: &Sample, history: &HistoryBuffer) -> Score {
    score_signals(&Signals::gather(sample, history))
}

pub fn score_signals(signals: &Signals) -> Score {
    let mut raw = 0.0;
    let mut reasons = Vec::new();

    for rule in TIERS.iter().filter_map(|tier| tier.evaluate(signals)) {
        raw += rule.points;
        reasons.push(rule.reason.to_string());
    }

    if reasons.is_empty() {
        reasons.push(NOMINAL_REASON.to_string());
    }

    Score {
        risk: raw.clamp(0.0, MAX_RISK),
        raw,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Sample {
        Sample::new(20.0, 30.0, 100.0, 0.5, 0)
    }

    fn signals(sample: Sample) -> Signals {
        Signals {
            sample,
            cpu_trend: None,
            memory_trend: None,
            traffic_trend: None,
            cpu_volatility: None,
        }
    }

    fn reasons_of(score: &Score) -> Vec<&str> {
        score.reasons.iter().map(String::as_str).collect()
    }

    #[test]
    fn critical_cpu_alone() {
        let sample = Sample::new(85.0, 50.0, 200.0, 1.0, 0);
        let score = score(&sample, &HistoryBuffer::default());
        assert_eq!(score.risk, 30.0);
        assert_eq!(reasons_of(&score), vec!["Critical CPU usage detected"]);
    }

    #[test]
    fn everything_critical_saturates() {
        let sample = Sample::new(90.0, 90.0, 1200.0, 5.0, 0);
        let score = score(&sample, &HistoryBuffer::default());
        assert_eq!(score.raw, 103.0);
        assert_eq!(score.risk, 100.0);
        assert_eq!(
            reasons_of(&score),
            vec![
                "Critical CPU usage detected",
                "Critical memory pressure",
                "High traffic spike detected",
                "Critical system load",
            ]
        );
    }

    #[test]
    fn nothing_fires_on_quiet_sample() {
        let score = score(&quiet(), &HistoryBuffer::default());
        assert_eq!(score.risk, 0.0);
        assert_eq!(reasons_of(&score), vec![NOMINAL_REASON]);
    }

    #[test]
    fn instantaneous_rules_one_by_one() {
        let cases: &[(Sample, f64, &str)] = &[
            (Sample::new(81.0, 30.0, 100.0, 0.5, 0), 30.0, "Critical CPU usage detected"),
            (Sample::new(61.0, 30.0, 100.0, 0.5, 0), 15.0, "Elevated CPU usage"),
            (Sample::new(20.0, 86.0, 100.0, 0.5, 0), 35.0, "Critical memory pressure"),
            (Sample::new(20.0, 71.0, 100.0, 0.5, 0), 20.0, "High memory consumption"),
            (Sample::new(20.0, 30.0, 1001.0, 0.5, 0), 18.0, "High traffic spike detected"),
            (Sample::new(20.0, 30.0, 801.0, 0.5, 0), 8.0, "Elevated traffic levels"),
            (Sample::new(20.0, 30.0, 100.0, 4.1, 0), 20.0, "Critical system load"),
            (Sample::new(20.0, 30.0, 100.0, 3.1, 0), 10.0, "High system load"),
        ];
        for (sample, points, reason) in cases {
            let score = score_signals(&signals(*sample));
            assert_eq!(score.risk, *points, "{reason}");
            assert_eq!(reasons_of(&score), vec![*reason]);
        }
    }

    #[test]
    fn thresholds_are_strict() {
        let sample = Sample::new(80.0, 85.0, 1000.0, 4.0, 0);
        let score = score_signals(&signals(sample));
        assert_eq!(
            reasons_of(&score),
            vec![
                "Elevated CPU usage",
                "High memory consumption",
                "Elevated traffic levels",
                "High system load",
            ]
        );
        assert_eq!(score.risk, 53.0);
    }

    #[test]
    fn history_rules_one_by_one() {
        let cases: &[(Signals, f64, &str)] = &[
            (Signals { cpu_trend: Some(2.5), ..signals(quiet()) }, 20.0, "Rapidly increasing CPU trend"),
            (Signals { cpu_trend: Some(1.5), ..signals(quiet()) }, 10.0, "Rising CPU trend detected"),
            (Signals { memory_trend: Some(1.6), ..signals(quiet()) }, 25.0, "Memory leak pattern detected"),
            (Signals { memory_trend: Some(0.9), ..signals(quiet()) }, 12.0, "Growing memory usage"),
            (Signals { traffic_trend: Some(51.0), ..signals(quiet()) }, 15.0, "Rapidly increasing traffic"),
            (Signals { cpu_volatility: Some(16.0), ..signals(quiet()) }, 15.0, "High system volatility"),
        ];
        for (signals, points, reason) in cases {
            let score = score_signals(signals);
            assert_eq!(score.risk, *points, "{reason}");
            assert_eq!(reasons_of(&score), vec![*reason]);
        }
    }

    #[test]
    fn trends_need_ten_samples() {
        let mut history = HistoryBuffer::default();
        for i in 0..9 {
            history.append(Sample::new(10.0 + 5.0 * i as f64, 30.0, 100.0, 0.5, i));
        }
        let latest = *history.latest().unwrap();
        let gathered = Signals::gather(&latest, &history);
        assert!(gathered.cpu_trend.is_none());
        assert!(gathered.cpu_volatility.is_some());

        history.append(Sample::new(55.0, 30.0, 100.0, 0.5, 9));
        let latest = *history.latest().unwrap();
        let score = score(&latest, &history);
        assert_eq!(reasons_of(&score), vec!["Rapidly increasing CPU trend"]);
    }

    #[test]
    fn rising_memory_and_traffic_from_history() {
        let mut history = HistoryBuffer::default();
        for i in 0..10 {
            let f = i as f64;
            history.append(Sample::new(20.0, 40.0 + 2.0 * f, 100.0 + 60.0 * f, 0.5, i as i64));
        }
        let latest = *history.latest().unwrap();
        let score = score(&latest, &history);
        // memory ends at 58, traffic at 640: only the trend rules fire
        assert_eq!(
            reasons_of(&score),
            vec!["Memory leak pattern detected", "Rapidly increasing traffic"]
        );
        assert_eq!(score.risk, 40.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let mut history = HistoryBuffer::default();
        for i in 0..12 {
            let cpu = if i % 2 == 0 { 70.0 } else { 30.0 };
            history.append(Sample::new(cpu, 75.0, 900.0, 3.5, i));
        }
        let latest = *history.latest().unwrap();
        let first = score(&latest, &history);
        let second = score(&latest, &history);
        assert_eq!(first, second);
        assert_eq!(
            reasons_of(&first),
            vec![
                "High memory consumption",
                "Elevated traffic levels",
                "High system load",
                "High system volatility",
            ]
        );
        assert_eq!(first.risk, 53.0);
    }

    #[test]
    fn every_tier_lists_higher_band_first() {
        for tier in TIERS {
            for pair in tier.rules.windows(2) {
                assert_eq!(pair[0].signal, pair[1].signal);
                assert!(pair[0].threshold > pair[1].threshold);
                assert!(pair[0].points > pair[1].points);
            }
        }
    }
}
