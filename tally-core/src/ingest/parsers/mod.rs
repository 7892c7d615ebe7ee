//! Source-specific parsers
//!
//! Each supported source has a parser module that implements
//! the [`SessionParser`](super::SessionParser) trait.
//!
//! | Source | Module | Backing store |
//! |--------|--------|---------------|
//! | Claude Code | [`claude`] | JSONL log per session |
//! | Cursor | [`cursor`] | SQLite `state.vscdb` (workspace + global) |

pub mod claude;
pub mod cursor;

pub use claude::{parse_session_metadata, ClaudeCodeParser, SessionMetadata};
pub use cursor::{normalize_tool, resolve_timestamp, CursorParser};

use super::SessionParser;
use crate::config::SourcePaths;
use crate::types::Source;
use std::sync::Arc;

/// Create a parser for every supported source.
pub fn create_all_parsers(paths: &SourcePaths) -> Vec<Arc<dyn SessionParser>> {
    Source::ALL
        .into_iter()
        .map(|source| parser_for(source, paths))
        .collect()
}

/// Get the parser for a specific source.
pub fn parser_for(source: Source, paths: &SourcePaths) -> Arc<dyn SessionParser> {
    match source {
        Source::ClaudeCode => Arc::new(ClaudeCodeParser::new()),
        Source::Cursor => Arc::new(CursorParser::new(paths.cursor_global_db())),
    }
}
