use crate::SampleSource;
use chronos_core::{Result, Sample};
use chrono::{Local, TimeZone, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Demo generator: slow sinusoidal baselines, a business-hours multiplier,
/// random bursts and jitter.
pub struct SyntheticSource {
    rng:   StdRng,
    clock: Clock,
}

enum Clock {
    Wall,
    /// Deterministic timestamps: `next`, then `next + step`, ...
    Stepped { next: i64, step: i64 },
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self {
            rng:   StdRng::from_entropy(),
            clock: Clock::Wall,
        }
    }

    /// Reproducible stream starting at `start_ms`, one sample every `step_ms`.
    pub fn seeded(seed: u64, start_ms: i64, step_ms: i64) -> Self {
        Self {
            rng:   StdRng::seed_from_u64(seed),
            clock: Clock::Stepped {
                next: start_ms,
                step: step_ms,
            },
        }
    }

    fn now(&mut self) -> i64 {
        match &mut self.clock {
            Clock::Wall => chrono::Utc::now().timestamp_millis(),
            Clock::Stepped { next, step } => {
                let ts = *next;
                *next += *step;
                ts
            }
        }
    }

    /// `chance` probability of a uniform burst up to `size`.
    fn burst(&mut self, chance: f64, size: f64) -> f64 {
        if self.rng.gen::<f64>() < chance {
            self.rng.gen::<f64>() * size
        } else {
            0.0
        }
    }

    fn jitter(&mut self, half_width: f64) -> f64 {
        self.rng.gen_range(-half_width..half_width)
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

fn peak_multiplier(timestamp: i64) -> f64 {
    let hour = Local
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|t| t.hour())
        .unwrap_or(0);
    if (9..=17).contains(&hour) {
        1.3
    } else {
        0.8
    }
}

impl SampleSource for SyntheticSource {
    fn next_sample(&mut self) -> Result<Sample> {
        let now = self.now();
        let t = now as f64;
        let peak = peak_multiplier(now);

        let base_cpu = 20.0 + (t / 60_000.0).sin() * 10.0;
        let base_memory = 40.0 + (t / 120_000.0).sin() * 15.0;
        let base_traffic = 400.0 + (t / 90_000.0).sin() * 150.0;

        let cpu_burst = self.burst(0.15, 30.0);
        let memory_burst = self.burst(0.10, 20.0);
        let traffic_burst = self.burst(0.10, 800.0);

        let cpu = (base_cpu * peak + cpu_burst + self.jitter(5.0)).clamp(5.0, 95.0);
        let memory = (base_memory * peak + memory_burst + self.jitter(4.0)).clamp(10.0, 95.0);
        let traffic = (base_traffic * peak + traffic_burst + self.jitter(50.0)).clamp(0.0, 2_000.0);
        let load = (cpu / 25.0 + self.jitter(0.3)).max(0.0);

        Ok(Sample::new(cpu, memory, traffic, load, now))
    }
}
