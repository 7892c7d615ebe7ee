//! Rollups over parsed sessions
//!
//! Per-session, per-project and global metrics. The project and global
//! variants share one fold ([`ActivityTotals`]); the global variant adds the
//! project and session counts supplied by the caller.
//!
//! Invariants of the fold:
//! - the timeline's per-day message counts sum to `message_count`
//! - per-file contributions sum to `lines_added` / `lines_removed` whenever
//!   every recorded line carried a file path

pub mod timeline;

pub use timeline::{day_of, TimelineEntry, UNDATED};

use crate::pricing::estimate_cost;
use crate::types::{FileContribution, ParsedSession, Role, Source, TokenTotals};
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use timeline::TimelineBuilder;

/// Metrics for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMetrics {
    pub session_id: String,
    pub project_id: String,
    pub source: Source,
    pub model: String,
    pub message_count: u64,
    pub user_messages: u64,
    pub assistant_messages: u64,
    pub tool_use_count: u64,
    pub tool_usage: HashMap<String, u64>,
    pub tokens: TokenTotals,
    pub lines_added: u64,
    pub lines_removed: u64,
    /// Distinct files with recorded contributions
    pub files_touched: usize,
    pub human_lines: u64,
    pub human_words: u64,
    pub human_chars: u64,
    pub duration_ms: f64,
    pub started_at: String,
    pub last_active: String,
    /// Estimated USD cost
    pub cost: f64,
}

/// Additive fold over many sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityTotals {
    /// Sessions folded in
    pub session_count: u64,
    pub message_count: u64,
    pub tokens: TokenTotals,
    pub tool_usage: HashMap<String, u64>,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub file_contributions: HashMap<String, FileContribution>,
    pub human_lines: u64,
    pub human_words: u64,
    pub human_chars: u64,
    pub duration_ms: f64,
    /// Sum of per-session cost estimates
    pub cost: f64,
    pub first_active: String,
    pub last_active: String,
    /// Model used by the most sessions (first seen wins ties)
    pub model: String,
    pub timeline: Vec<TimelineEntry>,
}

/// Rollup for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectMetrics {
    #[serde(flatten)]
    pub totals: ActivityTotals,
}

/// Rollup across every project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalMetrics {
    /// Projects discovered by the scan
    pub total_projects: usize,
    /// Sessions discovered by the scan
    pub total_sessions: usize,
    #[serde(flatten)]
    pub totals: ActivityTotals,
}

fn session_cost(session: &ParsedSession) -> f64 {
    estimate_cost(
        &session.model,
        session.total_tokens.input,
        session.total_tokens.output,
        session.total_tokens.cache_read,
    )
}

pub fn compute_session_metrics(session: &ParsedSession) -> SessionMetrics {
    let user_messages = session
        .messages
        .iter()
        .filter(|m| m.role == Role::User)
        .count() as u64;
    let message_count = session.messages.len() as u64;

    SessionMetrics {
        session_id: session.session_id.clone(),
        project_id: session.project_id.clone(),
        source: session.source,
        model: session.model.clone(),
        message_count,
        user_messages,
        assistant_messages: message_count - user_messages,
        tool_use_count: session.tool_use_count(),
        tool_usage: session.tool_usage.clone(),
        tokens: session.total_tokens,
        lines_added: session.lines_added,
        lines_removed: session.lines_removed,
        files_touched: session.file_contributions.len(),
        human_lines: session.human_lines,
        human_words: session.human_words,
        human_chars: session.human_chars,
        duration_ms: session.duration_ms,
        started_at: session.started_at.clone(),
        last_active: session.last_active.clone(),
        cost: session_cost(session),
    }
}

/// Fold sessions into totals and a daily timeline.
pub fn fold_sessions<S: Borrow<ParsedSession>>(sessions: &[S]) -> ActivityTotals {
    let mut totals = ActivityTotals::default();
    let mut timeline = TimelineBuilder::default();
    // model -> (sessions, first index)
    let mut models: HashMap<&str, (usize, usize)> = HashMap::new();

    for (index, session) in sessions.iter().enumerate() {
        let s: &ParsedSession = session.borrow();

        totals.session_count += 1;
        totals.message_count += s.messages.len() as u64;
        totals.tokens.add(&s.total_tokens);
        totals.lines_added += s.lines_added;
        totals.lines_removed += s.lines_removed;
        totals.human_lines += s.human_lines;
        totals.human_words += s.human_words;
        totals.human_chars += s.human_chars;
        totals.duration_ms += s.duration_ms;
        totals.cost += session_cost(s);

        for (tool, count) in &s.tool_usage {
            *totals.tool_usage.entry(tool.clone()).or_insert(0) += count;
        }
        for (file, contribution) in &s.file_contributions {
            let entry = totals.file_contributions.entry(file.clone()).or_default();
            entry.added += contribution.added;
            entry.removed += contribution.removed;
        }

        if !s.started_at.is_empty()
            && (totals.first_active.is_empty() || s.started_at < totals.first_active)
        {
            totals.first_active = s.started_at.clone();
        }
        if s.last_active > totals.last_active {
            totals.last_active = s.last_active.clone();
        }

        if !s.model.is_empty() {
            models.entry(s.model.as_str()).or_insert((0, index)).0 += 1;
        }

        timeline.add(s);
    }

    totals.model = models
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(model, _)| model.to_string())
        .unwrap_or_default();
    totals.timeline = timeline.finish();
    totals
}

pub fn compute_project_metrics<S: Borrow<ParsedSession>>(sessions: &[S]) -> ProjectMetrics {
    ProjectMetrics {
        totals: fold_sessions(sessions),
    }
}

pub fn compute_global_metrics<S: Borrow<ParsedSession>>(
    project_count: usize,
    session_count: usize,
    sessions: &[S],
) -> GlobalMetrics {
    GlobalMetrics {
        total_projects: project_count,
        total_sessions: session_count,
        totals: fold_sessions(sessions),
    }
}
