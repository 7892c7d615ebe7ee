//! Live activity from Cursor composers.
//!
//! Cursor writes every composer into one global `state.vscdb` (plus its WAL),
//! so a change cannot be attributed to a session from the path alone. Once
//! the store settles, every Cursor session is invalidated and the composer
//! with the newest `lastUpdatedAt` is summarized from its bubbles.

use super::{spawn_watch, Broadcast, SettledHandler, WatchHandle};
use crate::cache::SessionCache;
use crate::config::{cursor_global_db, WatcherConfig};
use crate::error::Result;
use crate::format::{shorten_path, single_line, truncate};
use crate::ingest::parsers::cursor::{
    build_session, created_at_millis, load_bubbles, open_read_only, value_bytes, Bubble,
};
use crate::ingest::scanner::scan_cursor_projects;
use crate::pricing::estimate_cost;
use crate::types::{ActivityEvent, Source};
use notify::RecursiveMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::summary::{DETAIL_MAX_CHARS, FALLBACK_ACTION};

/// Project id used when a composer belongs to no known workspace.
const UNKNOWN_PROJECT: &str = "cursor";

fn is_global_store(path: &Path) -> bool {
    matches!(
        path.file_name().and_then(|n| n.to_str()),
        Some("state.vscdb" | "state.vscdb-wal")
    )
}

/// `composerData:<id>` row of the global store.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ComposerRow {
    composer_id: Option<String>,
    last_updated_at: Option<f64>,
    created_at: Option<f64>,
}

/// Watches Cursor's global store and broadcasts the latest composer activity.
pub struct ComposerWatcher;

impl ComposerWatcher {
    /// Start watching the `globalStorage` directory under `cursor_user_dir`.
    pub fn start(
        cursor_user_dir: PathBuf,
        cache: Arc<SessionCache>,
        config: &WatcherConfig,
        broadcast: Broadcast,
    ) -> Result<WatchHandle> {
        let global_db = cursor_global_db(&cursor_user_dir);
        let target = global_db
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cursor_user_dir.clone());

        let handler: SettledHandler = Arc::new(move |_changed: PathBuf| {
            let dropped = cache.invalidate_source(Source::Cursor);
            tracing::debug!(dropped, "Invalidated Cursor sessions");
            if let Some(event) = latest_activity(&cursor_user_dir) {
                broadcast(event);
            }
        });

        spawn_watch(
            "composer",
            &target,
            RecursiveMode::NonRecursive,
            // the WAL and the main file settle as one store
            move |p: &Path| is_global_store(p).then(|| global_db.clone()),
            config.composer_debounce(),
            handler,
        )
    }
}

/// Id and `createdAt` (ms) of the most recently updated composer.
fn latest_composer(global_db: &Path) -> Result<Option<(String, Option<f64>)>> {
    let conn = open_read_only(global_db)?;
    let mut stmt =
        conn.prepare("SELECT key, value FROM cursorDiskKV WHERE key LIKE 'composerData:%'")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, value_bytes(row, 1)?)))?;

    let mut latest: Option<(f64, String, Option<f64>)> = None;
    for (key, value) in rows.flatten() {
        let Ok(row) = serde_json::from_slice::<ComposerRow>(&value) else {
            continue;
        };
        let Some(updated) = row.last_updated_at else {
            continue;
        };
        let id = row.composer_id.unwrap_or_else(|| {
            key.trim_start_matches("composerData:").to_string()
        });
        if latest.as_ref().map_or(true, |(best, _, _)| updated > *best) {
            latest = Some((updated, id, row.created_at.and_then(created_at_millis)));
        }
    }
    Ok(latest.map(|(_, id, created)| (id, created)))
}

/// Build the event for the most recently updated composer, if any.
pub(crate) fn latest_activity(cursor_user_dir: &Path) -> Option<ActivityEvent> {
    let global_db = cursor_global_db(cursor_user_dir);
    let (composer_id, created_at_ms) = match latest_composer(&global_db) {
        Ok(found) => found?,
        Err(e) => {
            tracing::debug!(error = %e, "Could not read latest composer");
            return None;
        }
    };

    let project = scan_cursor_projects(cursor_user_dir)
        .into_iter()
        .find(|p| p.session_files.iter().any(|f| f.id == composer_id));
    let project_id = project
        .as_ref()
        .map(|p| p.id.clone())
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string());
    let cwd = project.and_then(|p| p.path).unwrap_or_default();

    let bubbles = load_bubbles(&global_db, &composer_id);
    let session = build_session(&bubbles, &composer_id, &project_id, created_at_ms);
    let (action, detail) = bubbles
        .iter()
        .rev()
        .find_map(describe)
        .unwrap_or_else(|| (FALLBACK_ACTION.to_string(), String::new()));

    Some(ActivityEvent {
        project_id,
        session_id: composer_id,
        source: Source::Cursor,
        action,
        detail,
        first_prompt: session.first_prompt.clone(),
        cwd,
        model: session.model.clone(),
        cost: estimate_cost(
            &session.model,
            session.total_tokens.input,
            session.total_tokens.output,
            session.total_tokens.cache_read,
        ),
        message_count: session.messages.len() as u64,
        tool_use_count: session.tool_use_count(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

fn describe(bubble: &Bubble) -> Option<(String, String)> {
    let text = bubble.text.as_deref().unwrap_or("").trim();
    if bubble.is_user() {
        return (!text.is_empty()).then(|| {
            (
                "User message".to_string(),
                truncate(&single_line(text), DETAIL_MAX_CHARS),
            )
        });
    }
    if !bubble.is_assistant() {
        return None;
    }
    if let Some(path) = bubble.code_blocks.iter().flatten().find_map(|b| b.file_path()) {
        return Some(("Edit".to_string(), shorten_path(path)));
    }
    if let Some(tool) = bubble.tool_name() {
        return Some((tool.to_string(), String::new()));
    }
    (!text.is_empty()).then(|| {
        (
            "Responding".to_string(),
            truncate(&single_line(text), DETAIL_MAX_CHARS),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cursor_workspace_storage;
    use rusqlite::Connection;
    use serde_json::json;
    use tempfile::TempDir;

    const OLD: &str = "11111111-1111-4111-8111-111111111111";
    const NEW: &str = "22222222-2222-4222-8222-222222222222";

    fn seed(user_dir: &Path) {
        let global = cursor_global_db(user_dir);
        std::fs::create_dir_all(global.parent().unwrap()).unwrap();
        let conn = Connection::open(&global).unwrap();
        conn.execute_batch("CREATE TABLE cursorDiskKV (key TEXT, value BLOB);")
            .unwrap();
        let rows = [
            (
                format!("composerData:{}", OLD),
                json!({"composerId": OLD, "lastUpdatedAt": 1_700_000_000_000u64}),
            ),
            (
                format!("composerData:{}", NEW),
                json!({"composerId": NEW, "lastUpdatedAt": 1_700_000_500_000u64,
                       "createdAt": 1_700_000_400_000u64}),
            ),
            (
                format!("bubbleId:{}:b1", NEW),
                json!({"type": 1, "bubbleId": "b1", "text": "rename the module",
                       "timingInfo": {"clientStartTime": 1000}}),
            ),
            (
                format!("bubbleId:{}:b2", NEW),
                json!({"type": 2, "bubbleId": "b2", "text": "Renamed.",
                       "timingInfo": {"clientStartTime": 2000},
                       "codeBlocks": [{"content": "mod a;", "uri": {"_fsPath": "/home/u/p/src/lib.rs"}}]}),
            ),
        ];
        for (key, value) in rows {
            conn.execute(
                "INSERT INTO cursorDiskKV VALUES (?1, ?2)",
                rusqlite::params![key, value.to_string()],
            )
            .unwrap();
        }

        let ws = cursor_workspace_storage(user_dir).join("abc123");
        std::fs::create_dir_all(&ws).unwrap();
        std::fs::write(ws.join("workspace.json"), r#"{"folder":"file:///home/u/p"}"#).unwrap();
        let conn = Connection::open(ws.join("state.vscdb")).unwrap();
        conn.execute_batch("CREATE TABLE ItemTable (key TEXT, value BLOB);")
            .unwrap();
        conn.execute(
            "INSERT INTO ItemTable VALUES ('composer.composerData', ?1)",
            [json!({"allComposers": [{"composerId": NEW}]}).to_string()],
        )
        .unwrap();
    }

    #[test]
    fn test_latest_activity_picks_newest_composer() {
        let dir = TempDir::new().unwrap();
        seed(dir.path());

        let event = latest_activity(dir.path()).unwrap();
        assert_eq!(event.session_id, NEW);
        assert_eq!(event.project_id, "cursor-abc123");
        assert_eq!(event.cwd, "/home/u/p");
        assert_eq!(event.source, Source::Cursor);
        assert_eq!(event.action, "Edit");
        assert_eq!(event.detail, ".../src/lib.rs");
        assert_eq!(event.first_prompt, "rename the module");
        assert_eq!(event.message_count, 2);
        assert_eq!(event.tool_use_count, 1);
    }

    #[test]
    fn test_missing_store_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(latest_activity(dir.path()).is_none());
    }

    #[test]
    fn test_is_global_store() {
        assert!(is_global_store(Path::new("/g/globalStorage/state.vscdb")));
        assert!(is_global_store(Path::new("/g/globalStorage/state.vscdb-wal")));
        assert!(!is_global_store(Path::new("/g/globalStorage/storage.json")));
    }
}
