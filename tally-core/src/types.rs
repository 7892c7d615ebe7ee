//! Core domain types for tally
//!
//! These types are the normalized model shared by every source. Parsers turn
//! raw logs into [`ParsedSession`]s, the scanner groups session files into
//! [`Project`]s, and the watchers publish [`ActivityEvent`]s.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Source** | A coding assistant product whose logs we read (Claude Code, Cursor) |
//! | **Project** | A working directory, merged across every source that worked on it |
//! | **Session** | One continuous transcript, normalized into a [`ParsedSession`] |
//! | **Composer / Bubble** | Cursor's terms for a session / one turn of it |
//! | **Tool use** | An agent-initiated action (Read, Write, Edit, Bash, ...) |

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

// ============================================
// Source
// ============================================

/// Supported activity sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Append-only JSONL logs under `~/.claude/projects`
    ClaudeCode,
    /// Composer sessions stored in Cursor's `state.vscdb` databases
    Cursor,
}

impl Source {
    /// Every supported source, in project listing order
    pub const ALL: [Source; 2] = [Source::ClaudeCode, Source::Cursor];

    /// Returns the display name for this source
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::ClaudeCode => "Claude Code",
            Source::Cursor => "Cursor",
        }
    }

    /// Returns the identifier used in keys and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ClaudeCode => "claude_code",
            Source::Cursor => "cursor",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude_code" => Ok(Source::ClaudeCode),
            "cursor" => Ok(Source::Cursor),
            _ => Err(format!("unknown source: {}", s)),
        }
    }
}

// ============================================
// Tokens and contributions
// ============================================

/// Token usage as reported on a single assistant message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub cache_read_input_tokens: Option<u64>,
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u64>,
}

/// Accumulated token counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTotals {
    pub input: u64,
    pub output: u64,
    pub cache_read: u64,
    pub cache_creation: u64,
}

impl TokenTotals {
    /// Input plus output tokens.
    pub fn total(&self) -> u64 {
        self.input + self.output
    }

    /// Add one message's usage.
    pub fn add_usage(&mut self, usage: &TokenUsage) {
        self.input += usage.input_tokens.unwrap_or(0);
        self.output += usage.output_tokens.unwrap_or(0);
        self.cache_read += usage.cache_read_input_tokens.unwrap_or(0);
        self.cache_creation += usage.cache_creation_input_tokens.unwrap_or(0);
    }

    /// Add another set of totals.
    pub fn add(&mut self, other: &TokenTotals) {
        self.input += other.input;
        self.output += other.output;
        self.cache_read += other.cache_read;
        self.cache_creation += other.cache_creation;
    }
}

/// Lines an agent added to / removed from one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContribution {
    pub added: u64,
    pub removed: u64,
}

// ============================================
// Sessions
// ============================================

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One normalized turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    /// Flattened text content (tags stripped, assistant text capped)
    pub content: String,
    /// ISO-8601 timestamp; empty when the source carried none
    pub timestamp: String,
    /// Stable message id (event uuid or bubble id)
    pub id: String,
    /// Token usage for assistant messages, when reported
    pub usage: Option<TokenUsage>,
}

/// A session normalized from any source.
///
/// `messages` are timestamp-ascending. `first_prompt` is at most
/// [`FIRST_PROMPT_MAX_CHARS`](crate::ingest::FIRST_PROMPT_MAX_CHARS)
/// characters and only empty when the session has no user text.
///
/// `lines_added`/`lines_removed` include edits with no file path, which are
/// not attributed in `file_contributions`. Per-file sums can therefore be
/// lower than the session totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSession {
    pub session_id: String,
    pub project_id: String,
    pub cwd: String,
    pub messages: Vec<ConversationMessage>,
    pub tool_usage: HashMap<String, u64>,
    pub total_tokens: TokenTotals,
    pub duration_ms: f64,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub file_contributions: HashMap<String, FileContribution>,
    pub first_prompt: String,
    pub started_at: String,
    pub last_active: String,
    pub human_lines: u64,
    pub human_words: u64,
    pub human_chars: u64,
    /// First model name seen on an assistant message (may be empty)
    pub model: String,
    pub source: Source,
}

impl ParsedSession {
    /// An empty session shell for the given identity.
    pub fn empty(session_id: &str, project_id: &str, source: Source) -> Self {
        Self {
            session_id: session_id.to_string(),
            project_id: project_id.to_string(),
            cwd: String::new(),
            messages: Vec::new(),
            tool_usage: HashMap::new(),
            total_tokens: TokenTotals::default(),
            duration_ms: 0.0,
            lines_added: 0,
            lines_removed: 0,
            file_contributions: HashMap::new(),
            first_prompt: String::new(),
            started_at: String::new(),
            last_active: String::new(),
            human_lines: 0,
            human_words: 0,
            human_chars: 0,
            model: String::new(),
            source,
        }
    }

    /// Number of tool invocations across all tools.
    pub fn tool_use_count(&self) -> u64 {
        self.tool_usage.values().sum()
    }

    /// Record `added`/`removed` lines against `file_path` and the session totals.
    ///
    /// Without a (non-empty) path only the totals move.
    pub fn record_lines(&mut self, file_path: Option<&str>, added: u64, removed: u64) {
        self.lines_added += added;
        self.lines_removed += removed;
        if let Some(fp) = file_path.filter(|fp| !fp.is_empty()) {
            let entry = self.file_contributions.entry(fp.to_string()).or_default();
            entry.added += added;
            entry.removed += removed;
        }
    }

    /// Increment the usage counter for `tool`.
    pub fn record_tool(&mut self, tool: &str) {
        *self.tool_usage.entry(tool.to_string()).or_insert(0) += 1;
    }

    /// Count lines, words and characters of human-authored text.
    pub fn record_human_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.human_lines += trimmed.lines().count() as u64;
        self.human_words += trimmed.split_whitespace().count() as u64;
        self.human_chars += trimmed.chars().count() as u64;
    }
}

// ============================================
// Projects
// ============================================

/// Descriptor of one session's backing store.
///
/// For Claude Code this is the JSONL log itself. For Cursor the `path` is the
/// workspace `state.vscdb` and `id` is the composer id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    pub id: String,
    pub path: PathBuf,
    pub modified_at: Option<SystemTime>,
    pub size: u64,
    pub source: Source,
}

/// A working directory with every session that touched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    /// Resolved working directory; `None` when it could not be determined
    pub path: Option<String>,
    /// Source that created this project entry
    pub source: Source,
    /// All sources contributing sessions, in order of contribution
    pub sources: Vec<Source>,
    pub session_files: Vec<SessionFile>,
}

impl Project {
    /// Human-friendly name: last path component, or the id when unresolved.
    pub fn name(&self) -> &str {
        self.path
            .as_deref()
            .and_then(|p| p.trim_end_matches('/').rsplit('/').next())
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }
}

// ============================================
// Live activity
// ============================================

/// A live, non-authoritative summary of the latest change to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub project_id: String,
    pub session_id: String,
    pub source: Source,
    /// Short label, e.g. "Edit", "Responding", "Turn completed"
    pub action: String,
    /// Detail for the action (file path, command, text excerpt)
    pub detail: String,
    pub first_prompt: String,
    pub cwd: String,
    pub model: String,
    /// Approximate USD cost of the tokens seen so far
    pub cost: f64,
    pub message_count: u64,
    pub tool_use_count: u64,
    /// When the event was emitted (RFC 3339)
    pub timestamp: String,
}
