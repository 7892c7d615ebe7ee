//! Cheap "latest action" summaries of a Claude Code log
//!
//! Runs on every debounced change, so it never parses the whole log when the
//! log is large: only a head window (stable metadata: cwd, model, first
//! prompt) and a tail window (latest action) are read. Lines cut in half by a
//! window edge fail to decode and drop out like any malformed line.

use crate::config::WatcherConfig;
use crate::format::{shorten_path, single_line, truncate};
use crate::ingest::parsers::claude::{ContentBlock, RawEvent, SessionMetadata};
use crate::pricing::estimate_cost;
use crate::types::{TokenTotals, TokenUsage};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Longest text excerpt in a summary detail.
pub const DETAIL_MAX_CHARS: usize = 120;

/// Longest shell command in a `Bash` summary.
const COMMAND_MAX_CHARS: usize = 80;

/// Action reported when nothing better can be determined.
pub const FALLBACK_ACTION: &str = "Activity detected";

/// How much of a log the summarizer may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Logs at or under this size are read in full
    pub full_read_limit: u64,
    /// Bytes read from each end of larger logs
    pub window_bytes: u64,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self::from(&WatcherConfig::default())
    }
}

impl From<&WatcherConfig> for ReadLimits {
    fn from(config: &WatcherConfig) -> Self {
        Self {
            full_read_limit: config.full_read_limit,
            window_bytes: config.window_bytes,
        }
    }
}

/// What a log says about its session right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub action: String,
    pub detail: String,
    pub first_prompt: String,
    pub cwd: String,
    pub model: String,
    pub cost: f64,
    pub message_count: u64,
    pub tool_use_count: u64,
}

impl Default for ActivitySummary {
    fn default() -> Self {
        Self {
            action: FALLBACK_ACTION.to_string(),
            detail: String::new(),
            first_prompt: String::new(),
            cwd: String::new(),
            model: String::new(),
            cost: 0.0,
            message_count: 0,
            tool_use_count: 0,
        }
    }
}

/// Text read from a log: all of it, or its two ends.
#[derive(Debug)]
struct LogWindow {
    head: String,
    tail: Option<String>,
}

impl LogWindow {
    fn read(path: &Path, limits: ReadLimits) -> std::io::Result<Self> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();

        // windows of this size would overlap and count lines twice
        if len <= limits.full_read_limit.max(limits.window_bytes.saturating_mul(2)) {
            let mut bytes = Vec::with_capacity(len as usize);
            file.read_to_end(&mut bytes)?;
            return Ok(Self {
                head: String::from_utf8_lossy(&bytes).into_owned(),
                tail: None,
            });
        }

        let window = limits.window_bytes.min(len);
        let mut head = vec![0u8; window as usize];
        file.read_exact(&mut head)?;

        let mut tail = vec![0u8; window as usize];
        file.seek(SeekFrom::End(-(window as i64)))?;
        file.read_exact(&mut tail)?;

        Ok(Self {
            head: String::from_utf8_lossy(&head).into_owned(),
            tail: Some(String::from_utf8_lossy(&tail).into_owned()),
        })
    }

    fn head_lines(&self) -> std::str::Lines<'_> {
        self.head.lines()
    }

    /// Lines holding the most recent activity.
    fn recent_lines(&self) -> std::str::Lines<'_> {
        self.tail.as_deref().unwrap_or(&self.head).lines()
    }

    fn all_lines(&self) -> impl Iterator<Item = &str> {
        self.head.lines().chain(self.tail.iter().flat_map(|t| t.lines()))
    }
}

/// Summarize the latest activity of a log.
///
/// Never fails: an unreadable log yields [`FALLBACK_ACTION`] with no detail.
pub fn summarize_log(path: &Path, limits: ReadLimits) -> ActivitySummary {
    match LogWindow::read(path, limits) {
        Ok(window) => summarize_window(&window),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Could not read log for summary");
            ActivitySummary::default()
        }
    }
}

fn summarize_window(window: &LogWindow) -> ActivitySummary {
    let mut meta = SessionMetadata::default();
    for event in window.head_lines().filter_map(RawEvent::from_line) {
        meta.absorb(&event);
    }

    let counts = RunningCounts::collect(window.all_lines());
    let model = meta.model.unwrap_or_default();
    let cost = estimate_cost(
        &model,
        counts.tokens.input,
        counts.tokens.output,
        counts.tokens.cache_read,
    );

    let (action, detail) = latest_action(window.recent_lines())
        .unwrap_or_else(|| (FALLBACK_ACTION.to_string(), String::new()));

    ActivitySummary {
        action,
        detail,
        first_prompt: meta.first_prompt.unwrap_or_default(),
        cwd: meta.cwd.unwrap_or_default(),
        model,
        cost,
        message_count: counts.messages,
        tool_use_count: counts.tool_uses,
    }
}

/// Message, tool and token counts over whatever lines were read.
///
/// Streaming copies of one assistant message count once (last wins).
#[derive(Debug, Default)]
struct RunningCounts {
    messages: u64,
    tool_uses: u64,
    tokens: TokenTotals,
}

impl RunningCounts {
    fn collect<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        let mut counts = Self::default();
        // message.id -> (tool uses, usage) of the latest copy
        let mut by_id: HashMap<String, (u64, Option<TokenUsage>)> = HashMap::new();

        for event in lines.filter_map(RawEvent::from_line) {
            match event {
                RawEvent::User(e) if e.message.is_some() => counts.messages += 1,
                RawEvent::Assistant(e) => {
                    let Some(message) = e.message else { continue };
                    let tools = message
                        .content
                        .as_ref()
                        .map(|c| {
                            c.blocks()
                                .iter()
                                .filter(|b| matches!(b, ContentBlock::ToolUse { .. }))
                                .count() as u64
                        })
                        .unwrap_or(0);
                    match message.id {
                        Some(id) => {
                            by_id.insert(id, (tools, message.usage));
                        }
                        None => {
                            counts.messages += 1;
                            counts.tool_uses += tools;
                            if let Some(usage) = &message.usage {
                                counts.tokens.add_usage(usage);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        for (tools, usage) in by_id.into_values() {
            counts.messages += 1;
            counts.tool_uses += tools;
            if let Some(usage) = &usage {
                counts.tokens.add_usage(usage);
            }
        }
        counts
    }
}

/// Scan backward for the newest line that describes something.
fn latest_action<'a>(lines: impl DoubleEndedIterator<Item = &'a str>) -> Option<(String, String)> {
    lines
        .rev()
        .filter_map(RawEvent::from_line)
        .filter(|e| !e.is_noise())
        .find_map(|e| describe(&e))
}

fn excerpt(text: &str) -> String {
    truncate(&single_line(text), DETAIL_MAX_CHARS)
}

fn describe(event: &RawEvent) -> Option<(String, String)> {
    match event {
        RawEvent::System(system) if system.is_turn_duration() => {
            let secs = system.duration_ms.unwrap_or(0.0) / 1000.0;
            Some(("Turn completed".to_string(), format!("{:.1}s", secs)))
        }
        RawEvent::Assistant(e) => {
            let content = e.message.as_ref()?.content.as_ref()?;
            let blocks = content.blocks();
            if let Some((name, input)) = blocks.iter().rev().find_map(|b| match b {
                ContentBlock::ToolUse { name, input } => Some((name, input)),
                _ => None,
            }) {
                return Some((name.clone(), summarize_tool(name, input)));
            }
            let text = match content.first_text() {
                Some(t) if blocks.is_empty() => t,
                _ => blocks.iter().rev().find_map(|b| match b {
                    ContentBlock::Text { text } if !text.trim().is_empty() => Some(text.as_str()),
                    _ => None,
                })?,
            };
            (!text.trim().is_empty()).then(|| ("Responding".to_string(), excerpt(text)))
        }
        RawEvent::User(e) => {
            let content = e.message.as_ref()?.content.as_ref()?;
            if let Some(result) = content.blocks().iter().rev().find_map(|b| match b {
                ContentBlock::ToolResult { content } => Some(content),
                _ => None,
            }) {
                let detail = result.as_ref().map(|c| excerpt(&c.text())).unwrap_or_default();
                return Some(("Tool result received".to_string(), detail));
            }
            let text = content.joined_text();
            (!text.trim().is_empty()).then(|| ("User message".to_string(), excerpt(&text)))
        }
        _ => None,
    }
}

/// Short, tool-specific description of a tool invocation.
pub fn summarize_tool(name: &str, input: &serde_json::Value) -> String {
    let field = |key: &str| input.get(key).and_then(|v| v.as_str()).unwrap_or("");
    match name {
        "Read" | "Write" | "Edit" | "MultiEdit" | "NotebookEdit" => {
            let path = match field("file_path") {
                "" => field("notebook_path"),
                p => p,
            };
            shorten_path(path)
        }
        "Bash" => truncate(&single_line(field("command")), COMMAND_MAX_CHARS),
        "Grep" | "Glob" => field("pattern").to_string(),
        "Task" => excerpt(field("description")),
        "WebFetch" => field("url").to_string(),
        "WebSearch" => excerpt(field("query")),
        _ => String::new(),
    }
}
