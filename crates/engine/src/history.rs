use chronos_core::Sample;
use std::collections::VecDeque;

/// Default number of samples retained per stream.
pub const MAX_HISTORY: usize = 50;

/// Bounded, oldest-first ring of the most recent samples.
///
/// Appending to a full buffer evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples:  VecDeque<Sample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// A capacity of zero is bumped to one so the latest sample is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// The last `n` samples (fewer if history is shorter), oldest first.
    pub fn window(&self, n: usize) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        let start = self.samples.len().saturating_sub(n);
        self.samples.range(start..)
    }

    /// One metric projected out of the last `n` samples.
    pub fn series(&self, metric: Metric, n: usize) -> Vec<f64> {
        self.window(n).map(|s| metric.of(s)).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// The sample just before [`latest`](Self::latest).
    pub fn previous(&self) -> Option<&Sample> {
        self.samples.len().checked_sub(2).and_then(|i| self.samples.get(i))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        self.samples.iter()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

/// A numeric field of [`Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Memory,
    Traffic,
    Load,
}

impl Metric {
    pub fn of(self, sample: &Sample) -> f64 {
        match self {
            Metric::Cpu     => sample.cpu,
            Metric::Memory  => sample.memory,
            Metric::Traffic => sample.traffic,
            Metric::Load    => sample.load,
        }
    }
}
