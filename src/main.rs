//! chronos — streaming stability analytics daemon.
//!
//! Samples the host (or a synthetic generator), scores every sample and
//! writes one JSON result per line to stdout.
//!
//! Run with:  `RUST_LOG=info chronos [path/to/chronos.toml]`

use anyhow::Result;
use chronos_config::{default_path, load as load_config, ChronosConfig, ConfigWatcher, SourceKind};
use chronos_core::{RiskResult, Sample};
use chronos_engine::{Engine, MetricWindow, SpikeThresholds};
use chronos_system::{
    spawn_sampler, JsonLinesSink, NullSink, SampleSink, SampleSource, SyntheticSource,
    SystemSource,
};
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Swappable log filter; present only when `RUST_LOG` did not pin one.
type LogFilter = reload::Handle<EnvFilter, Registry>;

#[tokio::main]
async fn main() -> Result<()> {
    let log = init_logging();
    info!("chronos v{} starting", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_path);
    let config = load_config(&path)?;
    apply_log_level(log.as_ref(), &config.log.level);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(config, path, log, &mut out, tokio::signal::ctrl_c()).await
}

/// Structured logging on stderr. `RUST_LOG` wins; otherwise start at
/// `info` and let the config file's `log.level` take over once loaded.
fn init_logging() -> Option<LogFilter> {
    let from_env = EnvFilter::try_from_default_env().ok();
    let overridable = from_env.is_none();
    let (filter, handle) =
        reload::Layer::new(from_env.unwrap_or_else(|| EnvFilter::new("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    overridable.then_some(handle)
}

fn apply_log_level(log: Option<&LogFilter>, level: &str) {
    if let Some(handle) = log {
        if let Err(e) = handle.reload(EnvFilter::new(level)) {
            warn!("Cannot apply log level '{level}': {e}");
        }
    }
}

async fn run<W, F>(
    config: ChronosConfig,
    path: PathBuf,
    log: Option<LogFilter>,
    out: &mut W,
    shutdown: F,
) -> Result<()>
where
    W: Write,
    F: Future,
{
    let mut engine = Engine::from_config(&config);
    let mut window = MetricWindow::new(config.view.window, SpikeThresholds::from(&config.spike));
    let mut sink = open_sink(&config);

    let source: Box<dyn SampleSource + Send> = match config.sampling.source {
        SourceKind::System => Box::new(SystemSource::new()),
        SourceKind::Synthetic => Box::new(SyntheticSource::new()),
    };
    let mut sampler = spawn_sampler(source, config.sampling.interval_ms);

    let mut reloads = path
        .exists()
        .then(|| ConfigWatcher::spawn(&path).1);

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            sample = sampler.samples.recv() => {
                let Some(sample) = sample else { break };
                handle_sample(&mut engine, &mut window, sink.as_mut(), out, sample)?;
            }
            reloaded = recv_reload(&mut reloads) => {
                match reloaded {
                    Some(new_config) => {
                        if new_config.engine.history_capacity != engine.history().capacity() {
                            warn!("engine.history_capacity changes apply on restart");
                        }
                        engine.apply_config(&new_config);
                        window.set_spike_thresholds(SpikeThresholds::from(&new_config.spike));
                        sampler.set_interval(new_config.sampling.interval_ms);
                        apply_log_level(log.as_ref(), &new_config.log.level);
                    }
                    None => reloads = None,
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Score one sample, archive it, and deliver it. An archive failure is
/// logged and does not stop delivery.
fn handle_sample(
    engine: &mut Engine,
    window: &mut MetricWindow,
    sink: &mut dyn SampleSink,
    out: &mut impl Write,
    sample: Sample,
) -> Result<RiskResult> {
    let result = engine.ingest(sample);
    let point = window.push(&result);
    if point.is_spike {
        info!("Spike at {} (cpu {:.1}, memory {:.1}, traffic {:.1})",
            point.timestamp, point.cpu, point.memory, point.traffic);
    }
    let forecast = engine.forecast();
    let trend = forecast.trend();
    let points: Vec<_> = forecast.collect();
    debug!(trend, points = ?points, "risk forecast");

    if let Err(e) = sink.record(&result) {
        warn!("Archive write failed: {e}");
    }
    deliver(out, &result)?;
    Ok(result)
}

fn open_sink(config: &ChronosConfig) -> Box<dyn SampleSink + Send> {
    let Some(path) = &config.sink.path else {
        return Box::new(NullSink);
    };
    match JsonLinesSink::open(path) {
        Ok(sink) => {
            info!("Archiving results to '{}'", sink.path().display());
            Box::new(sink)
        }
        Err(e) => {
            warn!("Archive disabled: {e}");
            Box::new(NullSink)
        }
    }
}

/// Pending forever once the watcher is gone, so `select!` ignores it.
async fn recv_reload(
    reloads: &mut Option<tokio::sync::mpsc::Receiver<ChronosConfig>>,
) -> Option<ChronosConfig> {
    match reloads {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn deliver(out: &mut impl Write, result: &RiskResult) -> Result<()> {
    serde_json::to_writer(&mut *out, result)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
