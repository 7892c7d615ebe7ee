//! Live activity from Claude Code logs.
//!
//! Watches the projects tree recursively. Only top-level session logs count:
//! `.jsonl` files outside any `subagents` directory.

use super::summary::{summarize_log, ReadLimits};
use super::{spawn_watch, Broadcast, SettledHandler, WatchHandle};
use crate::cache::SessionCache;
use crate::config::WatcherConfig;
use crate::error::Result;
use crate::ingest::parsers::claude::session_id_from_path;
use crate::types::{ActivityEvent, Source};
use notify::RecursiveMode;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SUBAGENTS_DIR: &str = "subagents";

/// Whether a changed path is a session log worth summarizing.
pub(crate) fn is_session_log(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "jsonl")
        && !path.components().any(|c| c.as_os_str() == SUBAGENTS_DIR)
}

/// Project id of a log: the directory directly under `root` that holds it.
fn project_id_for(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .and_then(|rel| rel.components().next())
        .or_else(|| path.parent().and_then(|p| p.components().last()))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Watches Claude Code logs and broadcasts an [`ActivityEvent`] per settled change.
pub struct ActivityWatcher;

impl ActivityWatcher {
    /// Start watching `root` (normally `~/.claude/projects`).
    ///
    /// Each settled change invalidates the session in `cache`, summarizes the
    /// log and passes the event to `broadcast`.
    pub fn start(
        root: PathBuf,
        cache: Arc<SessionCache>,
        config: &WatcherConfig,
        broadcast: Broadcast,
    ) -> Result<WatchHandle> {
        let limits = ReadLimits::from(config);
        let handler_root = root.clone();
        let handler: SettledHandler = Arc::new(move |path: PathBuf| {
            let event = settle(&handler_root, &path, &cache, limits);
            broadcast(event);
        });

        spawn_watch(
            "activity",
            &root,
            RecursiveMode::Recursive,
            |p: &Path| is_session_log(p).then(|| p.to_path_buf()),
            config.debounce(),
            handler,
        )
    }
}

/// Invalidate and summarize one settled log.
pub(crate) fn settle(
    root: &Path,
    path: &Path,
    cache: &SessionCache,
    limits: ReadLimits,
) -> ActivityEvent {
    let session_id = session_id_from_path(path).unwrap_or_default();
    let project_id = project_id_for(root, path);

    cache.invalidate_session(&session_id);
    let summary = summarize_log(path, limits);

    tracing::debug!(
        session_id = %session_id,
        action = %summary.action,
        "Session activity"
    );

    ActivityEvent {
        project_id,
        session_id,
        source: Source::ClaudeCode,
        action: summary.action,
        detail: summary.detail,
        first_prompt: summary.first_prompt,
        cwd: summary.cwd,
        model: summary.model,
        cost: summary.cost,
        message_count: summary.message_count,
        tool_use_count: summary.tool_use_count,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}
