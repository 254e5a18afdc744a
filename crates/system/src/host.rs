use crate::SampleSource;
use chronos_core::{Result, Sample};
use std::time::Instant;
use sysinfo::{Networks, System, MINIMUM_CPU_UPDATE_INTERVAL};

/// Live host readings via `sysinfo`.
///
/// - cpu:     global CPU usage (%)
/// - memory:  used / total RAM (%)
/// - traffic: packets per second (rx + tx) across all interfaces
/// - load:    1-minute load average
pub struct SystemSource {
    sys:          System,
    networks:     Networks,
    last_refresh: Instant,
}

impl SystemSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            sys,
            networks:     Networks::new_with_refreshed_list(),
            last_refresh: Instant::now(),
        }
    }
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for SystemSource {
    fn next_sample(&mut self) -> Result<Sample> {
        // CPU usage is a delta between two refreshes; closer than the
        // minimum interval it reads as zero.
        let wait = MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(self.last_refresh.elapsed());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }

        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();
        self.networks.refresh(false); // false = keep existing interfaces list

        let elapsed = self.last_refresh.elapsed().as_secs_f64().max(1e-3);
        self.last_refresh = Instant::now();

        // ── CPU ──────────────────────────────────────────────────────────────
        let cpu = f64::from(self.sys.global_cpu_usage());

        // ── Memory ───────────────────────────────────────────────────────────
        let total = self.sys.total_memory();
        let memory = if total == 0 {
            0.0
        } else {
            self.sys.used_memory() as f64 / total as f64 * 100.0
        };

        // ── Network ──────────────────────────────────────────────────────────
        // Packet counters are deltas since the last refresh.
        let packets: u64 = self
            .networks
            .iter()
            .map(|(_, d)| d.packets_received() + d.packets_transmitted())
            .sum();
        let traffic = packets as f64 / elapsed;

        // ── Load ─────────────────────────────────────────────────────────────
        let load = System::load_average().one;

        Ok(Sample::new(
            cpu,
            memory,
            traffic,
            load,
            chrono::Utc::now().timestamp_millis(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reading_waits_for_cpu_baseline() {
        let created = Instant::now();
        let mut source = SystemSource::new();
        let sample = source.next_sample().unwrap();
        assert!(created.elapsed() >= MINIMUM_CPU_UPDATE_INTERVAL);
        assert!((0.0..=100.0).contains(&sample.cpu));
        assert!((0.0..=100.0).contains(&sample.memory));
    }
}
