//! Ingestion layer: discovering and parsing source logs
//!
//! ```text
//! ┌──────────────────────┐     ┌────────────────────┐     ┌───────────────┐
//! │    Source Stores     │ ──► │  scanner           │ ──► │  Vec<Project> │
//! │ ~/.claude/projects   │     │  (discover, merge) │     └───────┬───────┘
//! │ Cursor state.vscdb   │     └────────────────────┘             │
//! └──────────────────────┘                                        ▼
//!                               ┌────────────────────┐     ┌───────────────┐
//!                               │  SessionParser     │ ◄── │ SessionCache  │
//!                               │  ├─ ClaudeCode     │     └───────────────┘
//!                               │  └─ Cursor         │
//!                               └────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::ingest::{scan_all_projects, ClaudeCodeParser, ParseContext, SessionParser};
//!
//! let projects = scan_all_projects(&config.source_paths());
//! let file = &projects[0].session_files[0];
//! let session = ClaudeCodeParser::new().parse(&ParseContext {
//!     path: &file.path,
//!     session_id: &file.id,
//!     project_id: &projects[0].id,
//! })?;
//! ```

mod parser;
pub mod parsers;
pub mod scanner;

pub use parser::{ParseContext, SessionParser, FIRST_PROMPT_MAX_CHARS, MESSAGE_CONTENT_MAX_CHARS};
pub use parsers::{
    create_all_parsers, parse_session_metadata, parser_for, ClaudeCodeParser, CursorParser,
    SessionMetadata,
};
pub use scanner::{merge_projects, scan_all_projects, scan_claude_projects, scan_cursor_projects};
