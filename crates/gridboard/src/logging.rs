//! Logging initialization for gridboard.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `GRIDBOARD_LOG` environment variable. Falls back to the `[log] level`
//! from the config file when the variable is unset or invalid.
//!
//! # Usage
//!
//! ```bash
//! # Configured level (info by default)
//! gridboard show
//!
//! # Debug level
//! GRIDBOARD_LOG=debug gridboard show
//!
//! # Module-specific filtering
//! GRIDBOARD_LOG=gridboard::controller=trace,warn gridboard tui
//! ```

use crate::config::schema::{LogConfig, LogLevel};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "GRIDBOARD_LOG";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error.
    Stderr,
    /// Appended to a file.
    File(PathBuf),
    /// Dropped.
    Discard,
}

impl LogTarget {
    /// Picks the target for `config`. An interactive front end owns the
    /// terminal, so without a log file its output is discarded.
    pub fn select(config: &LogConfig, interactive: bool) -> Self {
        match config.file_path() {
            Some(path) => LogTarget::File(path),
            None if interactive => LogTarget::Discard,
            None => LogTarget::Stderr,
        }
    }
}

/// Builds the filter from `GRIDBOARD_LOG`, else from `fallback`.
pub fn filter(fallback: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback.as_filter()))
}

/// Initialize the tracing subscriber.
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init(config: &LogConfig, interactive: bool) -> io::Result<()> {
    let filter = filter(config.level);
    let builder = fmt().with_env_filter(filter).with_target(false);

    let result = match LogTarget::select(config, interactive) {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Discard => builder.with_writer(io::sink).try_init(),
    };
    result.map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
