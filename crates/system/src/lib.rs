pub mod host;
pub mod sink;
pub mod synthetic;

pub use host::SystemSource;
pub use sink::{JsonLinesSink, NullSink, SampleSink};
pub use synthetic::SyntheticSource;

use chronos_core::{Result, Sample};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

/// Produces one [`Sample`] per tick.
pub trait SampleSource {
    fn next_sample(&mut self) -> Result<Sample>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn next_sample(&mut self) -> Result<Sample> {
        (**self).next_sample()
    }
}

/// Handle to a running sampling task.
pub struct Sampler {
    pub samples: mpsc::Receiver<Sample>,
    interval:    watch::Sender<u64>,
}

impl Sampler {
    /// Change the tick interval; takes effect on the next tick.
    pub fn set_interval(&self, interval_ms: u64) {
        self.interval.send_if_modified(|current| {
            let changed = *current != interval_ms;
            *current = interval_ms;
            changed
        });
    }
}

/// Spawn a background Tokio task that pulls a sample from `source` every
/// `interval_ms` milliseconds and forwards it through the returned handle.
///
/// A failed read is logged and that tick skipped. The task stops when the
/// receiver is dropped.
pub fn spawn_sampler<S>(mut source: S, interval_ms: u64) -> Sampler
where
    S: SampleSource + Send + 'static,
{
    let (tx, rx) = mpsc::channel(4);
    let (interval_tx, mut interval_rx) = watch::channel(interval_ms);

    tokio::spawn(async move {
        let mut ticker = new_ticker(interval_ms);
        let mut watching = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match source.next_sample() {
                        Ok(sample) => {
                            if tx.send(sample).await.is_err() {
                                break; // all receivers dropped
                            }
                        }
                        Err(e) => warn!("Skipping tick: {e}"),
                    }
                }
                changed = interval_rx.changed(), if watching => {
                    if changed.is_err() {
                        watching = false;
                        continue;
                    }
                    let ms = *interval_rx.borrow_and_update();
                    info!("Sampling interval now {ms} ms");
                    ticker = new_ticker(ms);
                }
            }
        }
    });

    Sampler {
        samples:  rx,
        interval: interval_tx,
    }
}

fn new_ticker(interval_ms: u64) -> time::Interval {
    let mut ticker = time::interval(Duration::from_millis(interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
