//! Live reload of settings values from the configuration file.
//!
//! Only `settings.values` is applied while running. Any other difference
//! between the running configuration and the file is reported as needing a
//! restart and otherwise ignored.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::GatewayConfig;
use crate::settings::MemoryStore;

const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// Watches one config file and swaps its settings values into a store.
pub struct SettingsWatcher {
    path: PathBuf,
    running: GatewayConfig,
    settle: Duration,
}

impl SettingsWatcher {
    /// `running` is the configuration the gateway was started with.
    pub fn new(path: &Path, running: GatewayConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            running,
            settle: DEFAULT_SETTLE,
        }
    }

    /// How long a burst of file events must be quiet before the file is read.
    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Start watching and spawn the reload task.
    ///
    /// The task stops on shutdown or when the returned watcher is dropped,
    /// so the caller must keep it alive.
    pub fn spawn(
        self,
        store: Arc<MemoryStore>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    let _ = events_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Settings watcher started");
        tokio::spawn(self.apply_changes(events_rx, store, shutdown));
        Ok(watcher)
    }

    async fn apply_changes(
        self,
        mut events: mpsc::UnboundedReceiver<()>,
        store: Arc<MemoryStore>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                event = events.recv() => {
                    if event.is_none() {
                        break;
                    }
                }
                _ = shutdown.recv() => break,
            }

            // A rewrite arrives as truncate + write; read only the final state.
            tokio::time::sleep(self.settle).await;
            while events.try_recv().is_ok() {}

            if let Err(e) = self.reload(&store) {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Config reload rejected, keeping current settings"
                );
            }
        }

        tracing::debug!("Settings watcher stopped");
    }

    /// Load the file once and apply its settings values to `store`.
    pub fn reload(&self, store: &MemoryStore) -> Result<usize, ConfigError> {
        let next = load_config(&self.path)?;

        let pending = restart_required(&self.running, &next);
        if !pending.is_empty() {
            tracing::warn!(
                sections = ?pending,
                "Config changes outside settings.values need a restart"
            );
        }

        let count = next.settings.values.len();
        store.replace(next.settings.values);
        tracing::info!(values = count, "Settings reloaded");
        Ok(count)
    }
}

/// Sections that differ between `running` and `next` but are not reloaded.
pub fn restart_required(running: &GatewayConfig, next: &GatewayConfig) -> Vec<&'static str> {
    [
        ("listener", running.listener != next.listener),
        ("timeouts", running.timeouts != next.timeouts),
        ("http", running.http != next.http),
        ("messaging", running.messaging != next.messaging),
        ("settings.strict", running.settings.strict != next.settings.strict),
        ("observability", running.observability != next.observability),
    ]
    .into_iter()
    .filter_map(|(section, changed)| changed.then_some(section))
    .collect()
}
