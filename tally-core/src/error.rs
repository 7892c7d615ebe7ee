//! Error types for tally-core

use thiserror::Error;

/// Main error type for the tally-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error (Cursor state stores)
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error for a source log
    #[error("parse error in {format} log: {message}")]
    Parse { format: String, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// File watcher error
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Background task failed to complete
    #[error("task error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Session not found
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

/// Result type alias for tally-core
pub type Result<T> = std::result::Result<T, Error>;
