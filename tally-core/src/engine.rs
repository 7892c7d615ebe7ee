//! Engine facade
//!
//! Ties the scanner, parsers, cache and watchers together behind one owner.
//! Parsing is synchronous; [`Engine::load_project_sessions`] fans it out over
//! the blocking pool and returns results in descriptor order.

use crate::cache::SessionCache;
use crate::config::{Config, SourcePaths, WatcherConfig};
use crate::error::{Error, Result};
use crate::ingest::{create_all_parsers, scanner, SessionParser};
use crate::types::{ParsedSession, Project, SessionFile, Source};
use crate::watch::{ActivityWatcher, Broadcast, ComposerWatcher, WatchHandle};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Owns the session cache, one parser per source and the live watchers.
pub struct Engine {
    paths: SourcePaths,
    watcher_config: WatcherConfig,
    cache: Arc<SessionCache>,
    parsers: HashMap<Source, Arc<dyn SessionParser>>,
    activity: Option<WatchHandle>,
    composer: Option<WatchHandle>,
}

impl Engine {
    /// Create an engine from loaded configuration with the default parsers.
    pub fn new(config: &Config) -> Self {
        let paths = config.source_paths();
        let parsers = create_all_parsers(&paths);
        Self::with_parsers(paths, config.watcher.clone(), parsers)
    }

    /// Create an engine with custom parsers. A later parser for the same
    /// source replaces an earlier one.
    pub fn with_parsers(
        paths: SourcePaths,
        watcher_config: WatcherConfig,
        parsers: Vec<Arc<dyn SessionParser>>,
    ) -> Self {
        Self {
            paths,
            watcher_config,
            cache: Arc::new(SessionCache::new()),
            parsers: parsers.into_iter().map(|p| (p.source(), p)).collect(),
            activity: None,
            composer: None,
        }
    }

    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    /// Shared handle to the session cache.
    pub fn cache(&self) -> Arc<SessionCache> {
        Arc::clone(&self.cache)
    }

    fn parser(&self, source: Source) -> Result<Arc<dyn SessionParser>> {
        self.parsers
            .get(&source)
            .cloned()
            .ok_or_else(|| Error::Parse {
                format: source.to_string(),
                message: "no parser registered".to_string(),
            })
    }

    /// Discover projects across every source, merged by working directory.
    pub fn scan_all_projects(&self) -> Vec<Project> {
        scanner::scan_all_projects(&self.paths)
    }

    /// Parsed session for one descriptor, from the cache when still fresh.
    pub fn get_cached_session(
        &self,
        project_id: &str,
        file: &SessionFile,
    ) -> Result<Arc<ParsedSession>> {
        let parser = self.parser(file.source)?;
        self.cache
            .get(&file.id, &file.path, parser.as_ref(), project_id)
    }

    /// Parse every session of `project` concurrently.
    ///
    /// Results follow the order of `project.session_files`. Sessions that
    /// fail to parse are logged and left out.
    pub async fn load_project_sessions(&self, project: &Project) -> Result<Vec<Arc<ParsedSession>>> {
        let mut set = JoinSet::new();

        for (index, file) in project.session_files.iter().enumerate() {
            let parser = self.parser(file.source)?;
            let cache = Arc::clone(&self.cache);
            let file = file.clone();
            let project_id = project.id.clone();
            set.spawn_blocking(move || {
                let parsed = cache.get(&file.id, &file.path, parser.as_ref(), &project_id);
                (index, file.id, parsed)
            });
        }

        let mut loaded = Vec::with_capacity(project.session_files.len());
        while let Some(joined) = set.join_next().await {
            let (index, session_id, parsed) = joined?;
            match parsed {
                Ok(session) => loaded.push((index, session)),
                Err(e) => tracing::warn!(
                    project = %project.id,
                    session_id = %session_id,
                    error = %e,
                    "Failed to load session"
                ),
            }
        }

        loaded.sort_by_key(|(index, _)| *index);
        Ok(loaded.into_iter().map(|(_, session)| session).collect())
    }

    /// Parse every session of every project, in project order.
    pub async fn load_all_sessions(&self, projects: &[Project]) -> Result<Vec<Arc<ParsedSession>>> {
        self.load_all_sessions_with_progress(projects, |_, _| {})
            .await
    }

    /// Like [`Self::load_all_sessions`], reporting `(projects done, total)`
    /// after each project.
    pub async fn load_all_sessions_with_progress<F>(
        &self,
        projects: &[Project],
        mut on_progress: F,
    ) -> Result<Vec<Arc<ParsedSession>>>
    where
        F: FnMut(usize, usize),
    {
        let mut sessions = Vec::new();
        for (done, project) in projects.iter().enumerate() {
            sessions.extend(self.load_project_sessions(project).await?);
            on_progress(done + 1, projects.len());
        }
        tracing::debug!(
            projects = projects.len(),
            sessions = sessions.len(),
            "Loaded sessions"
        );
        Ok(sessions)
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Drop one session from the cache. Returns whether it was cached.
    pub fn invalidate_session(&self, session_id: &str) -> bool {
        self.cache.invalidate_session(session_id)
    }

    /// Start the Claude Code activity watcher. No-op if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_watcher(&mut self, broadcast: Broadcast) -> Result<()> {
        if self.activity.is_some() {
            tracing::debug!("Activity watcher already running");
            return Ok(());
        }
        self.activity = Some(ActivityWatcher::start(
            self.paths.claude_projects_dir.clone(),
            Arc::clone(&self.cache),
            &self.watcher_config,
            broadcast,
        )?);
        Ok(())
    }

    /// Start the Cursor composer watcher. No-op if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_composer_watcher(&mut self, broadcast: Broadcast) -> Result<()> {
        if self.composer.is_some() {
            tracing::debug!("Composer watcher already running");
            return Ok(());
        }
        self.composer = Some(ComposerWatcher::start(
            self.paths.cursor_user_dir.clone(),
            Arc::clone(&self.cache),
            &self.watcher_config,
            broadcast,
        )?);
        Ok(())
    }

    pub fn is_watching(&self) -> bool {
        self.activity.is_some() || self.composer.is_some()
    }

    /// Stop both watchers, cancelling pending debounce timers.
    pub async fn stop_watcher(&mut self) {
        if let Some(handle) = self.activity.take() {
            handle.stop().await;
        }
        if let Some(handle) = self.composer.take() {
            handle.stop().await;
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("paths", &self.paths)
            .field("cache", &self.cache)
            .field("watching", &self.is_watching())
            .finish()
    }
}
