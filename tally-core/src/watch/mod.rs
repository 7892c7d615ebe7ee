//! Live watchers
//!
//! Both watchers share one shape: a `notify` watcher filters raw
//! notifications down to interesting paths and forwards them over a channel
//! to a tokio task, which debounces per path and runs a handler on the
//! blocking pool once a path has been quiet for the configured delay.
//!
//! - [`ActivityWatcher`]: Claude Code logs, one event per changed log
//! - [`ComposerWatcher`]: Cursor's global store, one event for the most
//!   recently updated composer
//!
//! Stopping a watcher releases the `notify` handle and aborts every pending
//! timer. Handlers already running on the blocking pool finish on their own.

mod activity;
mod composer;
pub mod summary;

pub use activity::ActivityWatcher;
pub use composer::ComposerWatcher;
pub use summary::{summarize_log, summarize_tool, ActivitySummary, ReadLimits};

use crate::error::Result;
use crate::types::ActivityEvent;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Receives every live event.
pub type Broadcast = Arc<dyn Fn(ActivityEvent) + Send + Sync>;

/// Runs on the blocking pool once a path settles.
pub(crate) type SettledHandler = Arc<dyn Fn(PathBuf) + Send + Sync>;

/// Notifications buffered between the `notify` thread and the dispatcher.
const EVENT_BUFFER: usize = 1024;

/// A running watcher. Dropping it stops the watcher too.
pub struct WatchHandle {
    label: &'static str,
    watcher: Option<RecommendedWatcher>,
    shutdown: Option<oneshot::Sender<()>>,
    dispatch: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Stop watching, cancel pending timers and wait for the dispatcher.
    pub async fn stop(mut self) {
        self.watcher.take();
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(dispatch) = self.dispatch.take() {
            if let Err(e) = dispatch.await {
                tracing::warn!(watcher = self.label, error = %e, "Dispatcher ended abnormally");
            }
        }
        tracing::info!(watcher = self.label, "Watcher stopped");
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("label", &self.label)
            .field("running", &self.dispatch.is_some())
            .finish()
    }
}

/// Start a `notify` watcher on `target` and a debouncing dispatcher.
///
/// `route` maps a changed path to its debounce key, or `None` to ignore it.
/// Must be called from within a tokio runtime. A missing `target` is not an
/// error: the watcher idles and a warning is logged.
pub(crate) fn spawn_watch<F>(
    label: &'static str,
    target: &Path,
    mode: RecursiveMode,
    route: F,
    delay: Duration,
    handler: SettledHandler,
) -> Result<WatchHandle>
where
    F: Fn(&Path) -> Option<PathBuf> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<PathBuf>(EVENT_BUFFER);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                for key in event.paths.iter().filter_map(|p| route(p.as_path())) {
                    if tx.try_send(key).is_err() {
                        tracing::warn!(watcher = label, "Watcher channel full, notification dropped");
                    }
                }
            }
            Err(e) => tracing::error!(watcher = label, error = %e, "File watcher error"),
        }
    })?;

    if target.exists() {
        watcher.watch(target, mode)?;
        tracing::info!(watcher = label, path = %target.display(), "Watching for changes");
    } else {
        tracing::warn!(watcher = label, path = %target.display(), "Watch target does not exist; watcher idle");
    }

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let dispatch = tokio::spawn(run_debounced(rx, shutdown_rx, delay, handler));

    Ok(WatchHandle {
        label,
        watcher: Some(watcher),
        shutdown: Some(shutdown_tx),
        dispatch: Some(dispatch),
    })
}

/// Per-path debounce loop.
///
/// Every notification for a path aborts that path's pending timer and starts
/// a new one, so each path has at most one live timer. Ends when the channel
/// closes or `shutdown` fires, aborting whatever is still pending.
pub(crate) async fn run_debounced(
    mut rx: mpsc::Receiver<PathBuf>,
    mut shutdown: oneshot::Receiver<()>,
    delay: Duration,
    handler: SettledHandler,
) {
    let mut pending: HashMap<PathBuf, JoinHandle<()>> = HashMap::new();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            next = rx.recv() => {
                let Some(path) = next else { break };

                pending.retain(|_, timer| !timer.is_finished());
                if let Some(previous) = pending.remove(&path) {
                    previous.abort();
                }

                let handler = Arc::clone(&handler);
                let settled = path.clone();
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Err(e) = tokio::task::spawn_blocking(move || handler(settled)).await {
                        tracing::warn!(error = %e, "Settled handler failed");
                    }
                });
                pending.insert(path, timer);
            }
        }
    }

    for (_, timer) in pending.drain() {
        timer.abort();
    }
}
