//! Cursor composer parser
//!
//! Cursor keeps each chat ("composer") as a set of bubbles in the global
//! `state.vscdb` (`cursorDiskKV`, keys `bubbleId:<composerId>:<bubbleId>`).
//! The per-workspace `state.vscdb` only lists composer heads under
//! `composer.composerData`, which is where `createdAt` comes from.
//!
//! # Timestamps
//!
//! Bubble timing values come in two scales. Values above
//! [`EPOCH_MILLIS_THRESHOLD`] are absolute epoch milliseconds; smaller positive
//! values are offsets from the composer's `createdAt`. `createdAt` itself may
//! be epoch seconds or milliseconds, told apart by [`EPOCH_SECONDS_THRESHOLD`].
//! Both thresholds are heuristics matching what Cursor writes today, not a
//! documented format.
//!
//! # Failure policy
//!
//! A missing or unreadable store yields an empty bubble set; a row whose JSON
//! does not decode is skipped.

use crate::error::Result;
use crate::format::{clip, single_line, truncate};
use crate::ingest::parser::{
    ParseContext, SessionParser, FIRST_PROMPT_MAX_CHARS, MESSAGE_CONTENT_MAX_CHARS,
};
use crate::types::{ConversationMessage, ParsedSession, Role, Source};
use chrono::{DateTime, SecondsFormat};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Values above this are epoch seconds or larger.
pub const EPOCH_SECONDS_THRESHOLD: f64 = 1_000_000_000.0;

/// Values above this are epoch milliseconds.
pub const EPOCH_MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

const BUBBLE_USER: i64 = 1;
const BUBBLE_ASSISTANT: i64 = 2;

const COMPOSER_DATA_KEY: &str = "composer.composerData";

/// Map Cursor's native tool names onto Claude Code's vocabulary.
///
/// Unknown names pass through unchanged.
pub fn normalize_tool(name: &str) -> &str {
    match name {
        "edit_file" => "Edit",
        "create_file" => "Write",
        "run_terminal_command" => "Bash",
        "read_file" => "Read",
        "list_directory" | "file_search" => "Glob",
        "search_files" | "codebase_search" | "grep_search" => "Grep",
        other => other,
    }
}

/// Normalize a composer `createdAt` to epoch milliseconds.
pub fn created_at_millis(raw: f64) -> Option<f64> {
    if raw > EPOCH_MILLIS_THRESHOLD {
        Some(raw)
    } else if raw > EPOCH_SECONDS_THRESHOLD {
        Some(raw * 1000.0)
    } else {
        None
    }
}

/// Resolve a bubble timing value to epoch milliseconds.
///
/// Absolute values are kept, small positive values are offsets from
/// `created_at_ms`, and missing values fall back to `created_at_ms`.
pub fn resolve_timestamp(raw: Option<f64>, created_at_ms: Option<f64>) -> Option<f64> {
    match raw.filter(|v| *v > 0.0) {
        Some(v) if v > EPOCH_MILLIS_THRESHOLD => Some(v),
        Some(v) => created_at_ms.map(|base| base + v),
        None => created_at_ms,
    }
}

/// Epoch milliseconds as an RFC 3339 UTC string (`2025-01-01T10:00:00.000Z`).
pub fn millis_to_iso(ms: f64) -> String {
    DateTime::from_timestamp_millis(ms as i64)
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

// ============================================
// Stored record types
// ============================================

/// One turn of a composer, as stored in `cursorDiskKV`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Bubble {
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub bubble_id: Option<String>,
    pub text: Option<String>,
    pub token_count: Option<BubbleTokenCount>,
    pub code_blocks: Option<Vec<CodeBlock>>,
    pub timing_info: Option<BubbleTiming>,
    pub tool_former_data: Option<ToolFormerData>,
}

impl Bubble {
    fn start_time(&self) -> Option<f64> {
        self.timing_info.as_ref().and_then(|t| t.client_start_time)
    }

    fn end_time(&self) -> Option<f64> {
        self.timing_info
            .as_ref()
            .and_then(|t| t.client_end_time.or(t.client_settle_time))
    }

    pub(crate) fn is_user(&self) -> bool {
        self.kind == Some(BUBBLE_USER)
    }

    pub(crate) fn is_assistant(&self) -> bool {
        self.kind == Some(BUBBLE_ASSISTANT)
    }

    /// Normalized name of the tool this bubble ran, if any.
    pub(crate) fn tool_name(&self) -> Option<&str> {
        self.tool_former_data
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .filter(|n| !n.is_empty())
            .map(normalize_tool)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct BubbleTokenCount {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CodeBlock {
    pub content: Option<String>,
    pub uri: Option<CodeBlockUri>,
}

impl CodeBlock {
    pub(crate) fn file_path(&self) -> Option<&str> {
        self.uri
            .as_ref()
            .and_then(|u| u.fs_path.as_deref().or(u.path.as_deref()))
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct CodeBlockUri {
    #[serde(rename = "_fsPath")]
    pub fs_path: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct BubbleTiming {
    pub client_start_time: Option<f64>,
    pub client_end_time: Option<f64>,
    pub client_settle_time: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct ToolFormerData {
    pub name: Option<String>,
}

/// Composer entry in a workspace's `composer.composerData`.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ComposerHead {
    pub composer_id: String,
    #[serde(default)]
    pub created_at: Option<f64>,
    #[serde(default)]
    pub is_archived: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ComposerData {
    all_composers: Option<Vec<ComposerHead>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct WorkspaceJson {
    folder: Option<String>,
}

// ============================================
// Store access
// ============================================

pub(crate) fn open_read_only(path: &Path) -> Result<Connection> {
    Ok(Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?)
}

/// Raw bytes of a value column, which Cursor writes as TEXT or BLOB.
pub(crate) fn value_bytes(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Vec<u8>> {
    match row.get_ref(idx)? {
        ValueRef::Text(b) | ValueRef::Blob(b) => Ok(b.to_vec()),
        _ => Ok(Vec::new()),
    }
}

/// All bubbles of a composer, sorted by start time (missing = 0).
pub(crate) fn load_bubbles(global_db: &Path, composer_id: &str) -> Vec<Bubble> {
    if !global_db.exists() {
        return Vec::new();
    }
    match query_bubbles(global_db, composer_id) {
        Ok(mut bubbles) => {
            bubbles.sort_by(|a, b| {
                let ta = a.start_time().unwrap_or(0.0);
                let tb = b.start_time().unwrap_or(0.0);
                ta.total_cmp(&tb)
            });
            bubbles
        }
        Err(e) => {
            tracing::warn!(
                db = %global_db.display(),
                composer_id,
                error = %e,
                "Failed to read composer bubbles"
            );
            Vec::new()
        }
    }
}

fn query_bubbles(global_db: &Path, composer_id: &str) -> Result<Vec<Bubble>> {
    let conn = open_read_only(global_db)?;
    let mut stmt = conn.prepare("SELECT value FROM cursorDiskKV WHERE key LIKE ?1")?;
    let pattern = format!("bubbleId:{}:%", composer_id);

    let mut bubbles = Vec::new();
    let mut skipped = 0usize;
    let rows = stmt.query_map([&pattern], |row| value_bytes(row, 0))?;
    for row in rows {
        match row.ok().and_then(|v| serde_json::from_slice::<Bubble>(&v).ok()) {
            Some(bubble) => bubbles.push(bubble),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(composer_id, skipped, "Skipped undecodable bubble rows");
    }
    Ok(bubbles)
}

/// Ids of composers that have at least one bubble in the global store.
pub(crate) fn composer_ids_with_bubbles(global_db: &Path) -> HashSet<String> {
    if !global_db.exists() {
        return HashSet::new();
    }
    let query = || -> Result<HashSet<String>> {
        let conn = open_read_only(global_db)?;
        // bubbleId:<36-char composer id>:<bubble id>
        let mut stmt = conn.prepare(
            "SELECT DISTINCT substr(key, 10, 36) FROM cursorDiskKV WHERE key LIKE 'bubbleId:%'",
        )?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(ids)
    };
    query().unwrap_or_else(|e| {
        tracing::warn!(db = %global_db.display(), error = %e, "Failed to list composers");
        HashSet::new()
    })
}

/// Composer heads listed in a workspace store.
///
/// Checks `ItemTable` first and falls back to `cursorDiskKV`. `None` when the
/// store cannot be opened or neither table holds the key.
pub(crate) fn read_composer_heads(workspace_db: &Path) -> Option<Vec<ComposerHead>> {
    let conn = open_read_only(workspace_db).ok()?;
    let mut found = None;
    for table in ["ItemTable", "cursorDiskKV"] {
        let sql = format!("SELECT value FROM {} WHERE key = ?1", table);
        let Ok(raw) = conn.query_row(&sql, [COMPOSER_DATA_KEY], |row| value_bytes(row, 0)) else {
            continue;
        };
        let Ok(data) = serde_json::from_slice::<ComposerData>(&raw) else {
            continue;
        };
        let heads = data.all_composers.unwrap_or_default();
        if !heads.is_empty() {
            return Some(heads);
        }
        found.get_or_insert(heads);
    }
    found
}

/// `createdAt` of one composer, in epoch milliseconds.
fn composer_created_at(workspace_db: &Path, composer_id: &str) -> Option<f64> {
    read_composer_heads(workspace_db)?
        .into_iter()
        .find(|c| c.composer_id == composer_id)
        .and_then(|c| c.created_at)
        .and_then(created_at_millis)
}

/// Project folder of a workspace directory, from its `workspace.json`.
///
/// Remote workspaces and unparsable descriptors yield `None`.
pub(crate) fn workspace_folder(workspace_dir: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(workspace_dir.join("workspace.json")).ok()?;
    let ws: WorkspaceJson = serde_json::from_str(&raw).ok()?;
    let folder = ws.folder?;
    if folder.starts_with("vscode-remote://") {
        return None;
    }
    let path = folder.strip_prefix("file://").unwrap_or(&folder);
    let decoded = urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());
    Some(decoded).filter(|p| !p.is_empty())
}

// ============================================
// Parser
// ============================================

/// Parser for Cursor composer sessions.
///
/// `ParseContext::path` is the workspace `state.vscdb`; bubbles are read from
/// the global store this parser was created with.
#[derive(Debug, Clone)]
pub struct CursorParser {
    global_db: PathBuf,
}

impl CursorParser {
    pub fn new(global_db: impl Into<PathBuf>) -> Self {
        Self {
            global_db: global_db.into(),
        }
    }

    pub fn global_db(&self) -> &Path {
        &self.global_db
    }
}

impl SessionParser for CursorParser {
    fn source(&self) -> Source {
        Source::Cursor
    }

    fn parse(&self, ctx: &ParseContext) -> Result<ParsedSession> {
        let bubbles = load_bubbles(&self.global_db, ctx.session_id);
        let created_at_ms = composer_created_at(ctx.path, ctx.session_id);

        let mut session = build_session(&bubbles, ctx.session_id, ctx.project_id, created_at_ms);
        if let Some(folder) = ctx.path.parent().and_then(workspace_folder) {
            session.cwd = folder;
        }

        tracing::debug!(
            composer_id = ctx.session_id,
            bubbles = bubbles.len(),
            "Parsed composer"
        );
        Ok(session)
    }
}

/// Fold sorted bubbles into a [`ParsedSession`].
pub(crate) fn build_session(
    bubbles: &[Bubble],
    session_id: &str,
    project_id: &str,
    created_at_ms: Option<f64>,
) -> ParsedSession {
    let mut session = ParsedSession::empty(session_id, project_id, Source::Cursor);
    let created_at = created_at_ms.map(millis_to_iso).unwrap_or_default();

    for (index, bubble) in bubbles.iter().enumerate() {
        let ts = resolve_timestamp(bubble.start_time(), created_at_ms)
            .map(millis_to_iso)
            .unwrap_or_else(|| created_at.clone());
        if !ts.is_empty() {
            if session.started_at.is_empty() {
                session.started_at = ts.clone();
            }
            session.last_active = ts.clone();
        }

        let id = bubble
            .bubble_id
            .clone()
            .unwrap_or_else(|| format!("cursor-{}-{}", session_id, index));
        let text = bubble.text.as_deref().unwrap_or("");

        // The store reports cumulative input so far; keep the running max.
        if let Some(input) = bubble.token_count.as_ref().and_then(|t| t.input_tokens) {
            session.total_tokens.input = session.total_tokens.input.max(input);
        }

        if bubble.is_user() {
            let trimmed = text.trim();
            if session.first_prompt.is_empty() && !trimmed.is_empty() {
                session.first_prompt = clip(&single_line(trimmed), FIRST_PROMPT_MAX_CHARS);
            }
            session.record_human_text(trimmed);
            session.messages.push(ConversationMessage {
                role: Role::User,
                content: text.to_string(),
                timestamp: ts,
                id,
                usage: None,
            });
        } else if bubble.is_assistant() {
            if let Some(output) = bubble.token_count.as_ref().and_then(|t| t.output_tokens) {
                session.total_tokens.output += output;
            }

            // Only when both ends were recorded; a fallback anchor is not a duration.
            if bubble.start_time().is_some() && bubble.end_time().is_some() {
                let start = resolve_timestamp(bubble.start_time(), created_at_ms);
                let end = resolve_timestamp(bubble.end_time(), created_at_ms);
                if let (Some(start), Some(end)) = (start, end) {
                    session.duration_ms += (end - start).max(0.0);
                }
            }

            for block in bubble.code_blocks.iter().flatten() {
                let Some(content) = &block.content else {
                    continue;
                };
                let file_path = block.file_path();
                session.record_lines(file_path, content.lines().count() as u64, 0);
                if file_path.is_some() {
                    session.record_tool(normalize_tool("edit_file"));
                }
            }

            // Edits are already counted through their code blocks.
            if let Some(tool) = bubble.tool_name().filter(|t| *t != "Edit") {
                session.record_tool(tool);
            }

            session.messages.push(ConversationMessage {
                role: Role::Assistant,
                content: truncate(text, MESSAGE_CONTENT_MAX_CHARS),
                timestamp: ts,
                id,
                usage: None,
            });
        }
    }

    // Offsets and absolute times can interleave once resolved.
    session.messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    if session.started_at.is_empty() {
        session.started_at = created_at.clone();
    }
    if session.last_active.is_empty() {
        session.last_active = created_at;
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileContribution;
    use serde_json::json;
    use tempfile::TempDir;

    const COMPOSER: &str = "0b6f3a9e-1111-4222-8333-944445555666";

    fn global_store(dir: &Path, bubbles: &[(&str, serde_json::Value)]) -> PathBuf {
        let path = dir.join("global.vscdb");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE cursorDiskKV (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB);")
            .unwrap();
        for (bubble_id, value) in bubbles {
            conn.execute(
                "INSERT INTO cursorDiskKV (key, value) VALUES (?1, ?2)",
                rusqlite::params![
                    format!("bubbleId:{}:{}", COMPOSER, bubble_id),
                    value.to_string()
                ],
            )
            .unwrap();
        }
        path
    }

    fn workspace_store(dir: &Path, composers: serde_json::Value) -> PathBuf {
        let path = dir.join("state.vscdb");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB);")
            .unwrap();
        conn.execute(
            "INSERT INTO ItemTable (key, value) VALUES (?1, ?2)",
            rusqlite::params![COMPOSER_DATA_KEY, json!({ "allComposers": composers }).to_string()],
        )
        .unwrap();
        path
    }

    #[test]
    fn test_resolve_timestamp_branches() {
        let base = Some(1_700_000_000_000.0);

        // relative offset
        assert_eq!(resolve_timestamp(Some(42_000.0), base), Some(1_700_000_042_000.0));
        // absolute epoch ms
        assert_eq!(
            resolve_timestamp(Some(1_710_000_000_000.0), base),
            Some(1_710_000_000_000.0)
        );
        // missing falls back to createdAt
        assert_eq!(resolve_timestamp(None, base), base);
        assert_eq!(resolve_timestamp(Some(0.0), base), base);
        // offset without an anchor cannot resolve
        assert_eq!(resolve_timestamp(Some(42_000.0), None), None);
    }

    #[test]
    fn test_created_at_scales() {
        assert_eq!(created_at_millis(1_700_000_000_000.0), Some(1_700_000_000_000.0));
        assert_eq!(created_at_millis(1_700_000_000.0), Some(1_700_000_000_000.0));
        assert_eq!(created_at_millis(12_345.0), None);
    }

    #[test]
    fn test_normalize_tool() {
        assert_eq!(normalize_tool("edit_file"), "Edit");
        assert_eq!(normalize_tool("run_terminal_command"), "Bash");
        assert_eq!(normalize_tool("codebase_search"), "Grep");
        assert_eq!(normalize_tool("file_search"), "Glob");
        assert_eq!(normalize_tool("web_search"), "web_search");
    }

    #[test]
    fn test_build_session_relative_start() {
        let bubbles = vec![Bubble {
            kind: Some(BUBBLE_USER),
            text: Some("add a test".to_string()),
            timing_info: Some(BubbleTiming {
                client_start_time: Some(42_000.0),
                ..Default::default()
            }),
            ..Default::default()
        }];

        let session = build_session(&bubbles, COMPOSER, "p", Some(1_700_000_000_000.0));
        assert_eq!(session.started_at, millis_to_iso(1_700_000_042_000.0));
        assert_eq!(session.messages[0].timestamp, "2023-11-14T22:14:02.000Z");
        assert_eq!(session.first_prompt, "add a test");
        assert_eq!(session.human_words, 3);
    }

    #[test]
    fn test_input_tokens_running_max_output_summed() {
        let bubble = |kind, input, output| Bubble {
            kind: Some(kind),
            token_count: Some(BubbleTokenCount {
                input_tokens: Some(input),
                output_tokens: Some(output),
            }),
            ..Default::default()
        };
        let bubbles = vec![
            bubble(BUBBLE_ASSISTANT, 100, 10),
            bubble(BUBBLE_ASSISTANT, 400, 20),
            bubble(BUBBLE_ASSISTANT, 250, 5),
        ];

        let session = build_session(&bubbles, COMPOSER, "p", None);
        assert_eq!(session.total_tokens.input, 400);
        assert_eq!(session.total_tokens.output, 35);
    }

    #[test]
    fn test_parse_from_stores() {
        let dir = TempDir::new().unwrap();
        let global = global_store(
            dir.path(),
            &[
                (
                    "b2",
                    json!({
                        "type": 2,
                        "bubbleId": "b2",
                        "text": "Done.",
                        "tokenCount": {"inputTokens": 900, "outputTokens": 40},
                        "timingInfo": {"clientStartTime": 2000, "clientEndTime": 5000},
                        "codeBlocks": [
                            {"content": "a\nb\nc", "languageId": "rust",
                             "uri": {"_fsPath": "/home/u/p/src/lib.rs"}},
                            {"content": "x", "uri": {"path": "/home/u/p/README.md"}}
                        ]
                    }),
                ),
                (
                    "b1",
                    json!({
                        "type": 1,
                        "bubbleId": "b1",
                        "text": "  refactor the parser  ",
                        "timingInfo": {"clientStartTime": 1000}
                    }),
                ),
                (
                    "b3",
                    json!({
                        "type": 2,
                        "bubbleId": "b3",
                        "toolFormerData": {"name": "run_terminal_command"},
                        "timingInfo": {"clientStartTime": 6000}
                    }),
                ),
                ("bad", json!("not a bubble")),
            ],
        );
        let ws_dir = dir.path().join("ws1");
        std::fs::create_dir_all(&ws_dir).unwrap();
        std::fs::write(
            ws_dir.join("workspace.json"),
            r#"{"folder": "file:///home/u/my%20proj"}"#,
        )
        .unwrap();
        let ws = workspace_store(
            &ws_dir,
            json!([{ "composerId": COMPOSER, "createdAt": 1_700_000_000_000u64 }]),
        );

        let parser = CursorParser::new(&global);
        let session = parser
            .parse(&ParseContext {
                path: &ws,
                session_id: COMPOSER,
                project_id: "cursor-ws1",
            })
            .unwrap();

        assert_eq!(session.source, Source::Cursor);
        assert_eq!(session.cwd, "/home/u/my proj");
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[0].id, "b1");
        assert_eq!(session.first_prompt, "refactor the parser");
        assert_eq!(session.total_tokens.input, 900);
        assert_eq!(session.total_tokens.output, 40);
        assert!((session.duration_ms - 3000.0).abs() < f64::EPSILON);
        assert_eq!(session.lines_added, 4);
        assert_eq!(session.lines_removed, 0);
        assert_eq!(
            session.file_contributions["/home/u/p/src/lib.rs"],
            FileContribution { added: 3, removed: 0 }
        );
        assert_eq!(session.tool_usage["Edit"], 2);
        assert_eq!(session.tool_usage["Bash"], 1);
        assert_eq!(session.started_at, millis_to_iso(1_700_000_001_000.0));
        assert_eq!(session.last_active, millis_to_iso(1_700_000_006_000.0));
    }

    #[test]
    fn test_missing_store_is_empty_session() {
        let dir = TempDir::new().unwrap();
        let parser = CursorParser::new(dir.path().join("absent.vscdb"));
        let session = parser
            .parse(&ParseContext {
                path: &dir.path().join("also-absent.vscdb"),
                session_id: COMPOSER,
                project_id: "p",
            })
            .unwrap();
        assert!(session.messages.is_empty());
        assert!(session.started_at.is_empty());
    }

    #[test]
    fn test_composer_ids_with_bubbles() {
        let dir = TempDir::new().unwrap();
        let global = global_store(dir.path(), &[("b1", json!({"type": 1}))]);
        let ids = composer_ids_with_bubbles(&global);
        assert!(ids.contains(COMPOSER));
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_workspace_folder_skips_remote() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("workspace.json"),
            r#"{"folder": "vscode-remote://ssh-remote+box/home/u/p"}"#,
        )
        .unwrap();
        assert_eq!(workspace_folder(dir.path()), None);
    }
}
