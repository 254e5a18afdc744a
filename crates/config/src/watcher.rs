use crate::schema::ChronosConfig;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Watches the config file and re-parses it on every write.
///
/// Only configs that load and validate are forwarded; a broken edit is
/// logged and the previous config stays in effect.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_, mut rx) = chronos_config::ConfigWatcher::spawn("/home/user/.config/chronos/chronos.toml");
/// while let Some(config) = rx.recv().await {
///     println!("new interval: {} ms", config.sampling.interval_ms);
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver of freshly loaded configs.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<ChronosConfig>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<ChronosConfig>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", path.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) => {
                use notify::EventKind::*;
                if !matches!(e.kind, Modify(_) | Create(_)) {
                    continue;
                }
                match crate::load(&path) {
                    Ok(config) => {
                        info!("Config reloaded from '{}'", path.display());
                        if tx.send(config).await.is_err() {
                            break; // receiver dropped
                        }
                    }
                    Err(e) => warn!("Ignoring config change: {e}"),
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}
