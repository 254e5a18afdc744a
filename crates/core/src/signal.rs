use crate::sample::Sample;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Discrete stability classification derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Calm,
    Uneasy,
    Panic,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Calm   => "CALM",
            Mood::Uneasy => "UNEASY",
            Mood::Panic  => "PANIC",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The derived signal returned for every ingested [`Sample`].
///
/// Serializes to the delivery shape
/// `{cpu, memory, traffic, load, failure_risk, system_mood, reason, timestamp}`
/// where `reason` is the ordered reasons joined with `"; "`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub cpu:       f64,
    pub memory:    f64,
    pub traffic:   f64,
    pub load:      f64,
    #[serde(rename = "failure_risk")]
    pub risk:      f64,
    #[serde(rename = "system_mood")]
    pub mood:      Mood,
    #[serde(
        rename = "reason",
        serialize_with = "join_reasons",
        deserialize_with = "split_reasons"
    )]
    pub reasons:   Vec<String>,
    pub timestamp: i64,
}

/// Separator used when the reason list travels as a single string.
pub const REASON_SEPARATOR: &str = "; ";

impl RiskResult {
    /// Compose a result, applying the wire rounding: one decimal for the
    /// percentages, traffic and risk; two for load.
    pub fn compose(sample: &Sample, risk: f64, mood: Mood, reasons: Vec<String>) -> Self {
        Self {
            cpu:       round_to(sample.cpu, 1),
            memory:    round_to(sample.memory, 1),
            traffic:   round_to(sample.traffic, 1),
            load:      round_to(sample.load, 2),
            risk:      round_to(risk, 1),
            mood,
            reasons,
            timestamp: sample.timestamp,
        }
    }
}

fn join_reasons<S: Serializer>(reasons: &[String], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&reasons.join(REASON_SEPARATOR))
}

fn split_reasons<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let raw = String::deserialize(d)?;
    Ok(raw
        .split(REASON_SEPARATOR)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect())
}

/// One projected step of the risk forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Seconds ahead of the latest observation.
    pub offset_seconds: u64,
    pub projected_risk: f64,
}

/// A chartable point in a consumer-side rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp:    i64,
    pub cpu:          f64,
    pub memory:       f64,
    pub traffic:      f64,
    pub load:         f64,
    pub failure_risk: f64,
    pub is_spike:     bool,
}

impl MetricPoint {
    pub fn from_result(result: &RiskResult, is_spike: bool) -> Self {
        Self {
            timestamp:    result.timestamp,
            cpu:          result.cpu,
            memory:       result.memory,
            traffic:      result.traffic,
            load:         result.load,
            failure_risk: result.risk,
            is_spike,
        }
    }
}

/// Round half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
