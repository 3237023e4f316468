//! Gridboard library
//!
//! A dashboard of draggable, resizable tiles laid out on a column grid.
//! The layout survives restarts: it can be saved, reloaded, reset to a
//! built-in default, and extended with new tiles.
//!
//! The pieces, from the bottom up:
//!
//! - [`layout`]: widget specs, arrangements and the default preset.
//! - [`store`]: persists one arrangement as JSON in a key-value store.
//! - [`engine`]: the grid engine capability and an in-memory engine.
//! - [`controller`]: the layout lifecycle controller that owns the engine.
//! - [`view`]: mounts an engine once it is built and tears it down.
//! - [`tui`]: the terminal front end.

#![warn(missing_docs)]

/// Configuration file handling including XDG path resolution.
pub mod config;

/// Layout lifecycle controller.
pub mod controller;

/// Grid engine capability and the in-memory engine.
pub mod engine;

/// Widget specs, arrangements and the default preset.
pub mod layout;

/// Tracing subscriber setup.
pub mod logging;

/// Status signals reported to the host.
pub mod status;

/// Layout persistence.
pub mod store;

/// TUI module providing the terminal user interface for the dashboard.
pub mod tui;

/// Hosting view that mounts and unmounts the grid.
pub mod view;

pub use controller::LayoutController;
pub use engine::{GridContainer, GridEngine, GridEvent, GridOptions, MemoryGrid, SavedLayout};
pub use layout::{default_arrangement, Arrangement, WidgetSpec};
pub use status::{LayoutStatus, StatusObserver};
pub use store::{LayoutStore, PersistError, StoredLayout, STORAGE_KEY};
pub use view::DashboardView;
