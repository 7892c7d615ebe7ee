//! # tally-core
//!
//! Core library for tally - a usage tracker for AI coding assistants.
//!
//! This library provides:
//! - Parsers for Claude Code JSONL logs and Cursor composer databases
//! - Project discovery, merged across sources by working directory
//! - An in-memory session cache keyed by file modification time
//! - Session, project and global metrics
//! - Live activity watchers
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows one way:
//! - **Sources:** log files and SQLite stores on disk (read-only)
//! - **Sessions:** [`ParsedSession`] values, cached per session id
//! - **Metrics:** additive rollups recomputed from sessions on demand
//!
//! ## Example
//!
//! ```rust,no_run
//! use tally_core::{analytics, Config, Engine};
//!
//! # async fn run() -> tally_core::Result<()> {
//! let config = Config::load()?;
//! let engine = Engine::new(&config);
//!
//! let projects = engine.scan_all_projects();
//! let sessions = engine.load_all_sessions(&projects).await?;
//! let session_count = projects.iter().map(|p| p.session_files.len()).sum();
//! let metrics = analytics::compute_global_metrics(projects.len(), session_count, &sessions);
//! println!("{} messages", metrics.totals.message_count);
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use cache::SessionCache;
pub use config::Config;
pub use engine::Engine;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod pricing;
pub mod types;
pub mod watch;
