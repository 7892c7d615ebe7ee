//! Project discovery across sources
//!
//! Claude Code keeps one directory per project under `~/.claude/projects`,
//! named after the working directory with `/` replaced by `-`. Cursor keeps
//! one directory per workspace under `User/workspaceStorage`, each with a
//! `workspace.json` naming the folder and a `state.vscdb` listing composers.
//!
//! Both are turned into [`Project`]s and merged by resolved working
//! directory. Scanning is stateless and safe to repeat; a source that cannot
//! be read contributes nothing.

use crate::config::{cursor_global_db, cursor_workspace_storage, SourcePaths};
use crate::ingest::parsers::claude::{parse_session_metadata, session_id_from_path};
use crate::ingest::parsers::cursor::{composer_ids_with_bubbles, read_composer_heads, workspace_folder};
use crate::types::{Project, SessionFile, Source};
use std::collections::HashMap;
use std::path::Path;

/// Session files consulted when resolving a Claude project's cwd.
const CWD_PROBE_FILES: usize = 3;

/// Discover Claude Code projects and their session logs.
///
/// Projects come back in directory-name order, each with its logs in
/// file-name order. Directories without logs are skipped.
pub fn scan_claude_projects(projects_dir: &Path) -> Vec<Project> {
    if !projects_dir.is_dir() {
        tracing::debug!(dir = %projects_dir.display(), "Claude projects directory not found");
        return Vec::new();
    }

    let pattern = format!(
        "{}/*/*.jsonl",
        glob::Pattern::escape(&projects_dir.to_string_lossy())
    );
    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(pattern = %pattern, error = %e, "Invalid glob pattern");
            return Vec::new();
        }
    };

    let mut projects: Vec<Project> = Vec::new();
    for path in entries.flatten() {
        if !path.is_file() {
            continue;
        }
        let Some(project_id) = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(str::to_string)
        else {
            continue;
        };
        let Some(id) = session_id_from_path(&path) else {
            continue;
        };

        let metadata = std::fs::metadata(&path).ok();
        let file = SessionFile {
            id,
            modified_at: metadata.as_ref().and_then(|m| m.modified().ok()),
            size: metadata.map(|m| m.len()).unwrap_or(0),
            path,
            source: Source::ClaudeCode,
        };

        // glob yields sorted paths, so a project's logs are contiguous
        match projects.last_mut() {
            Some(project) if project.id == project_id => project.session_files.push(file),
            _ => projects.push(Project {
                id: project_id,
                path: None,
                source: Source::ClaudeCode,
                sources: vec![Source::ClaudeCode],
                session_files: vec![file],
            }),
        }
    }

    for project in &mut projects {
        project.path = resolve_claude_project_dir(&project.session_files, &project.id);
    }

    projects
}

/// Working directory of a Claude project.
///
/// The first probed session reporting a `cwd` wins. Otherwise the encoded
/// directory name is decoded, but only trusted when that path exists.
fn resolve_claude_project_dir(session_files: &[SessionFile], project_id: &str) -> Option<String> {
    for file in session_files.iter().take(CWD_PROBE_FILES) {
        match parse_session_metadata(&file.path) {
            Ok(meta) => {
                if let Some(cwd) = meta.cwd {
                    return Some(cwd);
                }
            }
            Err(e) => {
                tracing::debug!(path = %file.path.display(), error = %e, "Failed to read session metadata");
            }
        }
    }

    let decoded = decode_project_id(project_id);
    if Path::new(&decoded).exists() {
        Some(decoded)
    } else {
        tracing::debug!(project_id, "Could not resolve project directory");
        None
    }
}

/// `-home-u-proj` → `/home/u/proj`.
///
/// Lossy: dashes inside directory names decode as separators too.
pub fn decode_project_id(id: &str) -> String {
    format!("/{}", id.trim_start_matches('-').replace('-', "/"))
}

/// Discover Cursor workspaces with at least one used composer.
///
/// Remote workspaces, archived composers and composers that never recorded
/// a bubble are dropped. The session file of a composer is its workspace
/// `state.vscdb`.
pub fn scan_cursor_projects(cursor_user_dir: &Path) -> Vec<Project> {
    let storage = cursor_workspace_storage(cursor_user_dir);
    if !storage.is_dir() {
        tracing::debug!(dir = %storage.display(), "Cursor workspace storage not found");
        return Vec::new();
    }

    let active = composer_ids_with_bubbles(&cursor_global_db(cursor_user_dir));
    if active.is_empty() {
        return Vec::new();
    }

    let mut workspaces: Vec<_> = match std::fs::read_dir(&storage) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .collect(),
        Err(e) => {
            tracing::warn!(dir = %storage.display(), error = %e, "Failed to read workspace storage");
            return Vec::new();
        }
    };
    workspaces.sort_by_key(|e| e.file_name());

    let mut projects = Vec::new();
    for entry in workspaces {
        let workspace_dir = entry.path();
        let db_path = workspace_dir.join("state.vscdb");
        if !db_path.is_file() {
            continue;
        }
        let Some(folder) = workspace_folder(&workspace_dir) else {
            continue;
        };
        let Some(heads) = read_composer_heads(&db_path) else {
            continue;
        };

        let metadata = std::fs::metadata(&db_path).ok();
        let modified_at = metadata.and_then(|m| m.modified().ok());
        let session_files: Vec<SessionFile> = heads
            .into_iter()
            .filter(|c| !c.is_archived.unwrap_or(false))
            .filter(|c| active.contains(&c.composer_id))
            .map(|c| SessionFile {
                id: c.composer_id,
                path: db_path.clone(),
                modified_at,
                // the store is shared by every composer of the workspace
                size: 0,
                source: Source::Cursor,
            })
            .collect();

        if session_files.is_empty() {
            continue;
        }

        projects.push(Project {
            id: format!("cursor-{}", entry.file_name().to_string_lossy()),
            path: Some(folder),
            source: Source::Cursor,
            sources: vec![Source::Cursor],
            session_files,
        });
    }

    projects
}

fn normalize_path(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Merge projects that share a resolved working directory.
///
/// `primary` projects keep their order and come first; `secondary` projects
/// either fold into an existing entry (sessions appended, source recorded) or
/// are appended. Projects without a resolved path are never merged.
pub fn merge_projects(primary: Vec<Project>, secondary: Vec<Project>) -> Vec<Project> {
    let mut merged: Vec<Project> = Vec::new();
    let mut by_path: HashMap<String, usize> = HashMap::new();

    for project in primary.into_iter().chain(secondary) {
        let Some(key) = project.path.as_deref().map(normalize_path).map(str::to_string) else {
            merged.push(project);
            continue;
        };

        match by_path.get(&key) {
            Some(&idx) => {
                let existing = &mut merged[idx];
                for source in &project.sources {
                    if !existing.sources.contains(source) {
                        existing.sources.push(*source);
                    }
                }
                existing.session_files.extend(project.session_files);
            }
            None => {
                by_path.insert(key, merged.len());
                merged.push(project);
            }
        }
    }

    merged
}

/// Scan every source and merge the results.
pub fn scan_all_projects(paths: &SourcePaths) -> Vec<Project> {
    let claude = scan_claude_projects(&paths.claude_projects_dir);
    let cursor = scan_cursor_projects(&paths.cursor_user_dir);
    let (claude_count, cursor_count) = (claude.len(), cursor.len());

    let projects = merge_projects(claude, cursor);
    tracing::info!(
        claude = claude_count,
        cursor = cursor_count,
        merged = projects.len(),
        "Scanned projects"
    );
    projects
}
