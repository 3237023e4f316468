//! Default configuration template and file creation utilities.
//!
//! Provides a well-commented TOML template that matches `Config::default()`
//! and a function to write it to the config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A well-commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
/// Sections: `[grid]`, `[storage]`, `[tui]`, `[log]`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Gridboard Configuration
#
# This file was auto-generated with default values.
# All values shown below are the built-in defaults.
# Uncomment and modify options to customize your dashboard.
#
# Location: $XDG_CONFIG_HOME/gridboard/config.toml

# ==============================================================================
# Grid Configuration
# ==============================================================================

[grid]

# Number of columns in the grid.
# The built-in default layout is designed for 12 columns.
column = 12

# Height of one grid row, in pixels of the rendering surface.
cell_height = 80

# Gap between tiles, in pixels.
margin = 8

# Let tiles float upward into free space instead of packing.
float = true

# Animate position changes.
# Programmatic inserts always skip the animation for one frame.
animate = true

# ==============================================================================
# Storage Configuration
# ==============================================================================

[storage]

# Key the layout is saved under. Also the file name inside `dir`.
# Allowed characters: letters, digits, '.', '_' and '-'.
key = "dashboard-grid-layout"

# Directory holding the saved layout.
# Empty string means $XDG_DATA_HOME/gridboard (~/.local/share/gridboard).
# Tilde (~) is expanded to the user's home directory.
dir = ""

# ==============================================================================
# TUI Configuration
# ==============================================================================

[tui]

# Render tick rate as a human-readable duration.
# Controls how often the TUI redraws when idle.
# Examples: "250ms", "500ms", "1s"
tick_rate = "250ms"

# ==============================================================================
# Logging Configuration
# ==============================================================================

[log]

# Logging verbosity level. GRIDBOARD_LOG overrides this when set.
# Options: "error", "warn", "info", "debug", "trace"
#   error - Only errors
#   warn  - Errors and warnings
#   info  - General operational information (recommended)
#   debug - Detailed debugging information
#   trace - Very verbose, includes all grid events
level = "info"

# Path to log file. Empty string means log to stderr.
# The TUI owns the terminal, so without a file it logs nothing.
# Examples: "/tmp/gridboard.log", "~/.local/share/gridboard/gridboard.log"
file = ""
"#;

// ---------------------------------------------------------------------------
// File creation
// ---------------------------------------------------------------------------

/// Writes the default template to `path` (the XDG config path when `None`).
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(path: Option<&Path>, force: bool) -> Result<PathBuf, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(xdg::config_path);

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists { path });
        }
        // Back up existing file
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && !p.exists())
    {
        xdg::ensure_dir(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
            ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
