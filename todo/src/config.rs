//! Configuration management for the todo binary.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default storage directory
pub const DEFAULT_DATA_DIR: &str = ".todo-data";

/// Default log directive when `RUST_LOG` is unset
pub const DEFAULT_LOG: &str = "todo=info,composable_todo_runtime=warn";

/// Default drain time for pending writes at exit
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value that cannot be used
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

/// Which host surface the binary drives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Numbered rows on stdout
    #[default]
    Terminal,
    /// List container markup on stdout
    Html,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage directory (`TODO_DATA_DIR`)
    pub data_dir: PathBuf,
    /// Host surface (`TODO_SURFACE`)
    pub surface: SurfaceKind,
    /// Fallback log directive (`TODO_LOG`)
    pub log: String,
    /// Drain time for pending writes (`TODO_SHUTDOWN_TIMEOUT_SECS`)
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            surface: SurfaceKind::default(),
            log: DEFAULT_LOG.to_string(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, unset variables keep defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("TODO_DATA_DIR") {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "TODO_DATA_DIR",
                    value: dir,
                    reason: "must not be empty",
                });
            }
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(surface) = lookup("TODO_SURFACE") {
            config.surface = match surface.trim().to_ascii_lowercase().as_str() {
                "terminal" => SurfaceKind::Terminal,
                "html" => SurfaceKind::Html,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "TODO_SURFACE",
                        value: surface,
                        reason: "expected terminal or html",
                    });
                },
            };
        }

        if let Some(log) = lookup("TODO_LOG") {
            config.log = log;
        }

        if let Some(secs) = lookup("TODO_SHUTDOWN_TIMEOUT_SECS") {
            let parsed = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "TODO_SHUTDOWN_TIMEOUT_SECS",
                    value: secs.clone(),
                    reason: "expected whole seconds",
                })?;
            config.shutdown_timeout = Duration::from_secs(parsed);
        }

        Ok(config)
    }
}
