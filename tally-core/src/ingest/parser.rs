//! Parser trait abstraction
//!
//! Every source parser implements [`SessionParser`] so the cache and the
//! engine can treat Claude Code logs and Cursor composers alike.
//!
//! ## Design Principles
//!
//! 1. **Resilience**: a malformed line or row is skipped, never fatal
//! 2. **Purity**: the result is a function of the backing data only, so a
//!    duplicate parse is wasted work rather than a correctness problem
//! 3. **Extensible**: a new source only requires implementing this trait

use crate::error::Result;
use crate::types::{ParsedSession, Source};
use std::path::Path;

/// Longest first prompt kept on a [`ParsedSession`], in characters.
pub const FIRST_PROMPT_MAX_CHARS: usize = 200;

/// Longest assistant message content kept on a [`ParsedSession`], in characters.
pub const MESSAGE_CONTENT_MAX_CHARS: usize = 5000;

/// Identity of the session being parsed.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// Backing file (JSONL log, or Cursor workspace database)
    pub path: &'a Path,
    /// Session id (log file stem, or composer id)
    pub session_id: &'a str,
    /// Owning project id
    pub project_id: &'a str,
}

/// Trait implemented by all session parsers.
///
/// ## Error Handling
///
/// - Individual record failures are logged at debug level and skipped
/// - Only fatal errors (file cannot be read) are returned as `Err`
pub trait SessionParser: Send + Sync {
    /// Which source this parser handles
    fn source(&self) -> Source;

    /// Parse one session into the normalized model.
    fn parse(&self, ctx: &ParseContext) -> Result<ParsedSession>;
}
