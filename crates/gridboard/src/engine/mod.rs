//! Grid engine capability.
//!
//! The grid engine owns the drag, resize and collision mechanics of the
//! dashboard. The layout controller only ever talks to it through
//! [`GridEngine`], so any engine (the in-memory [`MemoryGrid`] or a real
//! renderer) can be attached.

mod memory;

pub use memory::{CallCounts, MemoryGrid};

use crate::layout::{Arrangement, WidgetSpec, DEFAULT_COLUMNS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Mutation notifications an engine can publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridEvent {
    /// One or more widgets were inserted.
    Added,
    /// One or more widgets were removed.
    Removed,
    /// A widget moved or was resized in place.
    Change,
}

/// The aggregate mutation event: add, remove and in-place change.
pub const MUTATION_EVENTS: [GridEvent; 3] =
    [GridEvent::Added, GridEvent::Removed, GridEvent::Change];

impl fmt::Display for GridEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridEvent::Added => write!(f, "added"),
            GridEvent::Removed => write!(f, "removed"),
            GridEvent::Change => write!(f, "change"),
        }
    }
}

/// Callback invoked with each event an engine fires.
pub type EventHandler = Arc<dyn Fn(GridEvent) + Send + Sync>;

/// Result of asking the engine to serialize itself.
///
/// Some save modes return the engine options alongside (or instead of) the
/// widget list. Only [`SavedLayout::Widgets`] is a persistable arrangement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedLayout {
    /// The current widgets, in order.
    Widgets(Arrangement),
    /// The engine's options rather than its widgets.
    Options(GridOptions),
}

impl SavedLayout {
    /// The arrangement, if this is the widget-list shape.
    pub fn into_arrangement(self) -> Option<Arrangement> {
        match self {
            SavedLayout::Widgets(arrangement) => Some(arrangement),
            SavedLayout::Options(_) => None,
        }
    }
}

/// Engine construction options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Column count of the grid.
    pub column: u32,
    /// Height of one row, in pixels of the rendering surface.
    pub cell_height: u32,
    /// Gap between tiles, in pixels.
    pub margin: u32,
    /// Whether tiles may float upward into free space.
    pub float: bool,
    /// Whether position changes animate.
    pub animate: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMNS,
            cell_height: 80,
            margin: 8,
            float: true,
            animate: true,
        }
    }
}

/// Handle to the element the engine renders into.
///
/// The container belongs to the hosting view; engines must leave it in place
/// when destroyed with `remove_container == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridContainer {
    name: String,
    column: u32,
}

impl GridContainer {
    /// Creates a container handle.
    pub fn new(name: impl Into<String>, column: u32) -> Self {
        Self {
            name: name.into(),
            column,
        }
    }

    /// The container's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column count the container is laid out for.
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for GridContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid `{}` ({} columns)", self.name, self.column)
    }
}

/// Capability surface of a live grid engine instance.
///
/// Engines may fire events synchronously from inside any mutating call,
/// including the bulk [`load`](GridEngine::load) and
/// [`remove_all`](GridEngine::remove_all).
pub trait GridEngine {
    /// Inserts a widget. Missing id or coordinates are filled in by the
    /// engine; the placed spec is returned.
    fn add_widget(&mut self, spec: WidgetSpec) -> WidgetSpec;

    /// Serializes the current arrangement.
    fn save(&self) -> SavedLayout;

    /// Bulk-inserts every widget of `arrangement`, in order.
    fn load(&mut self, arrangement: &Arrangement);

    /// Removes every widget.
    fn remove_all(&mut self);

    /// Subscribes `handler` to each of `events`.
    fn on(&mut self, events: &[GridEvent], handler: EventHandler);

    /// Drops every handler subscribed to any of `events`.
    fn off(&mut self, events: &[GridEvent]);

    /// Turns position animation on or off.
    fn set_animation(&mut self, enabled: bool);

    /// Whether position animation is currently on.
    fn animation_enabled(&self) -> bool;

    /// Releases the engine's resources. The container element is removed
    /// only when `remove_container` is set.
    fn destroy(&mut self, remove_container: bool);
}

impl<E: GridEngine + ?Sized> GridEngine for Box<E> {
    fn add_widget(&mut self, spec: WidgetSpec) -> WidgetSpec {
        (**self).add_widget(spec)
    }

    fn save(&self) -> SavedLayout {
        (**self).save()
    }

    fn load(&mut self, arrangement: &Arrangement) {
        (**self).load(arrangement)
    }

    fn remove_all(&mut self) {
        (**self).remove_all()
    }

    fn on(&mut self, events: &[GridEvent], handler: EventHandler) {
        (**self).on(events, handler)
    }

    fn off(&mut self, events: &[GridEvent]) {
        (**self).off(events)
    }

    fn set_animation(&mut self, enabled: bool) {
        (**self).set_animation(enabled)
    }

    fn animation_enabled(&self) -> bool {
        (**self).animation_enabled()
    }

    fn destroy(&mut self, remove_container: bool) {
        (**self).destroy(remove_container)
    }
}
