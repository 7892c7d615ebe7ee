//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/tally/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/tally/` (~/.config/tally/)
//! - State/Logs: `$XDG_STATE_HOME/tally/` (~/.local/state/tally/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Source path overrides
    #[serde(default)]
    pub sources: SourceOverrides,

    /// Live watcher tuning
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Override paths for source directories
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SourceOverrides {
    /// Override for the Claude Code projects directory (~/.claude/projects)
    pub claude_projects_dir: Option<PathBuf>,
    /// Override for Cursor's `User` directory (holds workspaceStorage/ and globalStorage/)
    pub cursor_user_dir: Option<PathBuf>,
}

/// Live watcher configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WatcherConfig {
    /// Quiet period after the last change to a log before it is summarized
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Quiet period for Cursor's global database
    #[serde(default = "default_composer_debounce_ms")]
    pub composer_debounce_ms: u64,

    /// Logs at or under this size are read in full
    #[serde(default = "default_full_read_limit")]
    pub full_read_limit: u64,

    /// Bytes read from each end of larger logs
    #[serde(default = "default_window_bytes")]
    pub window_bytes: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            composer_debounce_ms: default_composer_debounce_ms(),
            full_read_limit: default_full_read_limit(),
            window_bytes: default_window_bytes(),
        }
    }
}

impl WatcherConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn composer_debounce(&self) -> Duration {
        Duration::from_millis(self.composer_debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_composer_debounce_ms() -> u64 {
    1000
}

fn default_full_read_limit() -> u64 {
    32 * 1024
}

fn default_window_bytes() -> u64 {
    8 * 1024
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Resolved locations of every source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    /// `~/.claude/projects`
    pub claude_projects_dir: PathBuf,
    /// Cursor's `User` directory
    pub cursor_user_dir: PathBuf,
}

impl SourcePaths {
    /// `User/workspaceStorage`, one subdirectory per workspace
    pub fn cursor_workspace_storage(&self) -> PathBuf {
        cursor_workspace_storage(&self.cursor_user_dir)
    }

    /// `User/globalStorage/state.vscdb`, where bubbles live
    pub fn cursor_global_db(&self) -> PathBuf {
        cursor_global_db(&self.cursor_user_dir)
    }
}

pub fn cursor_workspace_storage(user_dir: &Path) -> PathBuf {
    user_dir.join("workspaceStorage")
}

pub fn cursor_global_db(user_dir: &Path) -> PathBuf {
    user_dir.join("globalStorage").join("state.vscdb")
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the watcher cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.watcher.window_bytes == 0 {
            return Err(Error::Config(
                "watcher.window_bytes must be greater than 0".to_string(),
            ));
        }
        // head and tail windows must not overlap on a windowed read
        if self.watcher.full_read_limit < self.watcher.window_bytes.saturating_mul(2) {
            return Err(Error::Config(
                "watcher.full_read_limit must be at least twice watcher.window_bytes".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve source locations, applying overrides
    pub fn source_paths(&self) -> SourcePaths {
        SourcePaths {
            claude_projects_dir: self
                .sources
                .claude_projects_dir
                .clone()
                .unwrap_or_else(Self::default_claude_projects_dir),
            cursor_user_dir: self
                .sources
                .cursor_user_dir
                .clone()
                .unwrap_or_else(Self::default_cursor_user_dir),
        }
    }

    /// `~/.claude/projects`
    pub fn default_claude_projects_dir() -> PathBuf {
        home_dir().join(".claude").join("projects")
    }

    /// Cursor's per-platform `User` directory
    ///
    /// macOS: `~/Library/Application Support/Cursor/User`,
    /// Linux: `~/.config/Cursor/User`, Windows: `%APPDATA%\Cursor\User`.
    pub fn default_cursor_user_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| home_dir().join(".config"))
            .join("Cursor")
            .join("User")
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/tally/config.toml` (~/.config/tally/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("tally").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/tally/` (~/.local/state/tally/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("tally")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/tally/tally.log` (~/.local/state/tally/tally.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("tally.log")
    }
}
