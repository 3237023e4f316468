//! TOML configuration schema types for gridboard.
//!
//! All structs derive `Deserialize` and `Serialize` with sensible defaults via
//! `#[serde(default)]`, so a partial file only overrides what it names.
//!
//! Duration fields use human-readable strings (e.g. `"250ms"`) parsed by the
//! `humantime` crate in [`Config::validate`] and at the call site.

use crate::config::error::ConfigError;
use crate::config::xdg;
use crate::engine::GridOptions;
use crate::store::STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// Corresponds to the full TOML file structure:
/// ```toml
/// [grid]
/// [storage]
/// [tui]
/// [log]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid engine options.
    pub grid: GridOptions,
    /// Where the layout is persisted.
    pub storage: StorageConfig,
    /// Terminal UI settings.
    pub tui: TuiConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl Config {
    /// Checks values that parse as TOML but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.column == 0 {
            return Err(ConfigError::InvalidValue {
                field: "grid.column",
                message: "must be at least 1".to_string(),
            });
        }
        if self.grid.cell_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "grid.cell_height",
                message: "must be at least 1".to_string(),
            });
        }
        self.storage.validate_key()?;
        self.tui.tick_rate()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Layout persistence settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the layout is stored under; also the file name in `dir`.
    pub key: String,
    /// Directory holding stored values. Empty string means the XDG data
    /// directory. Tilde (`~`) is expanded.
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: STORAGE_KEY.to_string(),
            dir: String::new(),
        }
    }
}

impl StorageConfig {
    /// The directory to store values in.
    pub fn resolved_dir(&self) -> PathBuf {
        if self.dir.is_empty() {
            xdg::data_dir()
        } else {
            xdg::expand_tilde(&self.dir)
        }
    }

    fn validate_key(&self) -> Result<(), ConfigError> {
        if local_kv::is_valid_key(&self.key) {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "storage.key",
                message: format!(
                    "{:?} must be non-empty and use only letters, digits, '.', '_' or '-'",
                    self.key
                ),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// TUI
// ---------------------------------------------------------------------------

/// Terminal UI configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TuiConfig {
    /// Render tick rate as a human-readable duration (e.g. `"250ms"`).
    pub tick_rate: String,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate: "250ms".to_string(),
        }
    }
}

impl TuiConfig {
    /// The tick rate as a duration.
    pub fn tick_rate(&self) -> Result<Duration, ConfigError> {
        let rate = humantime::parse_duration(&self.tick_rate).map_err(|e| {
            ConfigError::InvalidValue {
                field: "tui.tick_rate",
                message: format!("{:?}: {e}", self.tick_rate),
            }
        })?;
        if rate.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "tui.tick_rate",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(rate)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration from the TOML `[log]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Logging verbosity.
    pub level: LogLevel,
    /// Path to log file. Empty string means stderr (and no output at all
    /// while the TUI owns the terminal).
    pub file: String,
}

impl LogConfig {
    /// The log file, if one is configured.
    pub fn file_path(&self) -> Option<PathBuf> {
        if self.file.is_empty() {
            None
        } else {
            Some(xdg::expand_tilde(&self.file))
        }
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
