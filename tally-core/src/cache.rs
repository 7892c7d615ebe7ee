//! In-memory session cache keyed by modification time
//!
//! Parsed sessions are kept per session id together with the modification
//! time of their backing file. A lookup whose file still has the same
//! modification time returns the stored [`Arc`] without parsing; any other
//! lookup parses and replaces the entry. Entries are only dropped by explicit
//! invalidation, never by age or size.
//!
//! The map lock is never held while parsing. Two concurrent misses for the
//! same session both parse and the later write wins; parses are a pure
//! function of the file, so the cost is duplicate work only.

use crate::error::Result;
use crate::ingest::{ParseContext, SessionParser};
use crate::types::{ParsedSession, Source};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

struct CacheEntry {
    session: Arc<ParsedSession>,
    fingerprint: Option<SystemTime>,
}

/// Shared cache of parsed sessions.
#[derive(Default)]
pub struct SessionCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

/// Modification time of `path`, if it can be read.
pub fn fingerprint(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached session, parsing it first if missing or stale.
    ///
    /// A file without a readable modification time is always re-parsed.
    pub fn get(
        &self,
        session_id: &str,
        path: &Path,
        parser: &dyn SessionParser,
        project_id: &str,
    ) -> Result<Arc<ParsedSession>> {
        let current = fingerprint(path);

        if current.is_some() {
            if let Some(entry) = self.lock().get(session_id) {
                if entry.fingerprint == current {
                    return Ok(Arc::clone(&entry.session));
                }
            }
        }

        let session = Arc::new(parser.parse(&ParseContext {
            path,
            session_id,
            project_id,
        })?);

        tracing::debug!(session_id, source = %parser.source(), "Cached session");
        self.lock().insert(
            session_id.to_string(),
            CacheEntry {
                session: Arc::clone(&session),
                fingerprint: current,
            },
        );
        Ok(session)
    }

    /// Drop one session. Returns whether it was cached.
    pub fn invalidate_session(&self, session_id: &str) -> bool {
        self.lock().remove(session_id).is_some()
    }

    /// Drop every session parsed from `source`.
    pub fn invalidate_source(&self, source: Source) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.session.source != source);
        before - entries.len()
    }

    /// Drop everything.
    pub fn invalidate_all(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("entries", &self.len())
            .finish()
    }
}
