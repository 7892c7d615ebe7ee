//! Daily activity timeline.

use crate::types::{ParsedSession, Source};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Bucket for sessions without a start timestamp.
///
/// Sorts after every ISO date, so undated activity lands at the end.
pub const UNDATED: &str = "unknown";

/// Activity for one calendar day (UTC date part of the start timestamp).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// `YYYY-MM-DD`, or [`UNDATED`]
    pub date: String,
    pub sessions: u64,
    pub messages: u64,
    pub sessions_by_source: BTreeMap<Source, u64>,
    pub messages_by_source: BTreeMap<Source, u64>,
    pub token_input: u64,
    pub token_output: u64,
}

/// Day key of a session: the part of `started_at` before `T`.
pub fn day_of(session: &ParsedSession) -> &str {
    session
        .started_at
        .split('T')
        .next()
        .filter(|d| !d.is_empty())
        .unwrap_or(UNDATED)
}

/// Accumulates sessions into per-day buckets.
#[derive(Debug, Default)]
pub(crate) struct TimelineBuilder {
    days: HashMap<String, TimelineEntry>,
}

impl TimelineBuilder {
    pub(crate) fn add(&mut self, session: &ParsedSession) {
        let day = day_of(session);
        let entry = self
            .days
            .entry(day.to_string())
            .or_insert_with(|| TimelineEntry {
                date: day.to_string(),
                ..Default::default()
            });

        let messages = session.messages.len() as u64;
        entry.sessions += 1;
        entry.messages += messages;
        *entry.sessions_by_source.entry(session.source).or_insert(0) += 1;
        *entry.messages_by_source.entry(session.source).or_insert(0) += messages;
        entry.token_input += session.total_tokens.input;
        entry.token_output += session.total_tokens.output;
    }

    /// Buckets sorted ascending by date.
    pub(crate) fn finish(self) -> Vec<TimelineEntry> {
        let mut timeline: Vec<TimelineEntry> = self.days.into_values().collect();
        timeline.sort_by(|a, b| a.date.cmp(&b.date));
        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of() {
        let mut session = ParsedSession::empty("s", "p", Source::ClaudeCode);
        session.started_at = "2025-03-04T23:59:59.000Z".to_string();
        assert_eq!(day_of(&session), "2025-03-04");

        session.started_at.clear();
        assert_eq!(day_of(&session), UNDATED);
    }

    #[test]
    fn test_undated_sorts_last() {
        let mut builder = TimelineBuilder::default();
        let mut dated = ParsedSession::empty("a", "p", Source::Cursor);
        dated.started_at = "2025-01-02T00:00:00Z".to_string();
        builder.add(&ParsedSession::empty("b", "p", Source::ClaudeCode));
        builder.add(&dated);

        let timeline = builder.finish();
        assert_eq!(timeline[0].date, "2025-01-02");
        assert_eq!(timeline[1].date, UNDATED);
        assert_eq!(timeline[0].sessions_by_source[&Source::Cursor], 1);
    }
}
