//! In-memory grid engine.
//!
//! `MemoryGrid` keeps tiles in a vector and implements just enough of an
//! engine to drive the dashboard: id assignment, naive auto-placement, event
//! publication and animation toggling. There is no collision or float
//! handling. Clones are handles to the same instance, so a terminal front
//! end can drive user-style edits while the controller owns its own handle.

use super::{EventHandler, GridContainer, GridEngine, GridEvent, GridOptions, SavedLayout};
use crate::layout::{Arrangement, WidgetSpec};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How many times each engine capability was invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `add_widget` calls.
    pub add_widget: usize,
    /// `load` calls.
    pub load: usize,
    /// `remove_all` calls.
    pub remove_all: usize,
    /// `on` calls.
    pub on: usize,
    /// `off` calls.
    pub off: usize,
    /// `set_animation` calls.
    pub set_animation: usize,
    /// `destroy` calls.
    pub destroy: usize,
}

struct GridState {
    options: GridOptions,
    container: GridContainer,
    widgets: Vec<WidgetSpec>,
    handlers: Vec<(GridEvent, EventHandler)>,
    next_generated_id: u64,
    selected: Option<usize>,
    save_options: bool,
    destroyed: bool,
    container_removed: bool,
    calls: CallCounts,
}

impl GridState {
    fn place(&mut self, mut spec: WidgetSpec) -> WidgetSpec {
        if spec.id.is_none() {
            self.next_generated_id += 1;
            spec.id = Some(format!("gen-{}", self.next_generated_id));
        }
        if spec.x.is_none() || spec.y.is_none() {
            let below = self.widgets.iter().map(WidgetSpec::bottom).max().unwrap_or(0);
            spec.x = Some(spec.x.unwrap_or(0));
            spec.y = Some(below);
        }
        spec.w = spec.w.clamp(1, self.options.column.max(1));
        spec.h = spec.h.max(1);
        self.widgets.push(spec.clone());
        spec
    }

    fn handlers_for(&self, event: GridEvent) -> Vec<EventHandler> {
        self.handlers
            .iter()
            .filter(|(subscribed, _)| *subscribed == event)
            .map(|(_, handler)| Arc::clone(handler))
            .collect()
    }
}

/// Shared-handle in-memory engine.
#[derive(Clone)]
pub struct MemoryGrid {
    inner: Arc<Mutex<GridState>>,
}

impl std::fmt::Debug for MemoryGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("MemoryGrid")
            .field("container", &state.container)
            .field("widgets", &state.widgets.len())
            .field("handler_count", &state.handlers.len())
            .field("destroyed", &state.destroyed)
            .finish()
    }
}

impl MemoryGrid {
    /// Initializes an engine on `container`.
    pub fn new(options: GridOptions, container: GridContainer) -> Self {
        tracing::debug!(%container, ?options, "memory grid initialized");
        Self {
            inner: Arc::new(Mutex::new(GridState {
                options,
                container,
                widgets: Vec::new(),
                handlers: Vec::new(),
                next_generated_id: 0,
                selected: None,
                save_options: false,
                destroyed: false,
                container_removed: false,
                calls: CallCounts::default(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, GridState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invokes subscribers with the lock released, so a handler may call
    /// back into the engine.
    fn fire(&self, event: GridEvent) {
        let handlers = self.state().handlers_for(event);
        for handler in handlers {
            handler(event);
        }
    }

    /// Whether two handles point at the same engine instance.
    pub fn same_instance(&self, other: &MemoryGrid) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Snapshot of the current tiles, in order.
    pub fn widgets(&self) -> Vec<WidgetSpec> {
        self.state().widgets.clone()
    }

    /// Count of current tiles.
    pub fn len(&self) -> usize {
        self.state().widgets.len()
    }

    /// Whether the grid holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.state().widgets.is_empty()
    }

    /// Engine options as currently set.
    pub fn options(&self) -> GridOptions {
        self.state().options.clone()
    }

    /// The container the engine was initialized on.
    pub fn container(&self) -> GridContainer {
        self.state().container.clone()
    }

    /// Invocation counters.
    pub fn calls(&self) -> CallCounts {
        self.state().calls
    }

    /// Count of live subscriptions.
    pub fn handler_count(&self) -> usize {
        self.state().handlers.len()
    }

    /// Whether `destroy` has run.
    pub fn is_destroyed(&self) -> bool {
        self.state().destroyed
    }

    /// Whether `destroy` was asked to remove the container.
    pub fn container_removed(&self) -> bool {
        self.state().container_removed
    }

    /// Makes `save` return the options shape instead of the widget list.
    pub fn set_save_options(&self, enabled: bool) {
        self.state().save_options = enabled;
    }

    /// Identifier of the selected tile.
    pub fn selected(&self) -> Option<String> {
        let state = self.state();
        let id = state
            .selected
            .and_then(|index| state.widgets.get(index))
            .and_then(|w| w.id.clone());
        id
    }

    /// Moves the selection to the next tile, wrapping around.
    pub fn select_next(&self) -> Option<String> {
        {
            let mut state = self.state();
            let count = state.widgets.len();
            state.selected = match (state.selected, count) {
                (_, 0) => None,
                (Some(index), _) => Some((index + 1) % count),
                (None, _) => Some(0),
            };
        }
        self.selected()
    }

    /// Moves the selected tile by `(dx, dy)` cells, clamped to the grid.
    ///
    /// Fires [`GridEvent::Change`] and returns `true` if the tile moved.
    pub fn move_selected(&self, dx: i32, dy: i32) -> bool {
        let moved = {
            let mut state = self.state();
            if state.destroyed {
                return false;
            }
            let column = state.options.column;
            let Some(index) = state.selected.filter(|&i| i < state.widgets.len()) else {
                return false;
            };
            let widget = &mut state.widgets[index];
            let max_x = column.saturating_sub(widget.w);
            let x = shift(widget.x.unwrap_or(0), dx).min(max_x);
            let y = shift(widget.y.unwrap_or(0), dy);
            let changed = widget.x != Some(x) || widget.y != Some(y);
            widget.x = Some(x);
            widget.y = Some(y);
            changed
        };
        if moved {
            self.fire(GridEvent::Change);
        }
        moved
    }

    /// Removes the selected tile, firing [`GridEvent::Removed`].
    pub fn remove_selected(&self) -> Option<WidgetSpec> {
        let removed = {
            let mut state = self.state();
            if state.destroyed {
                return None;
            }
            let index = state.selected.filter(|&i| i < state.widgets.len())?;
            let removed = state.widgets.remove(index);
            let remaining = state.widgets.len();
            state.selected = if remaining == 0 {
                None
            } else {
                Some(index.min(remaining - 1))
            };
            removed
        };
        self.fire(GridEvent::Removed);
        Some(removed)
    }
}

fn shift(value: u32, delta: i32) -> u32 {
    if delta.is_negative() {
        value.saturating_sub(delta.unsigned_abs())
    } else {
        value.saturating_add(delta.unsigned_abs())
    }
}

impl GridEngine for MemoryGrid {
    fn add_widget(&mut self, spec: WidgetSpec) -> WidgetSpec {
        let placed = {
            let mut state = self.state();
            state.calls.add_widget += 1;
            if state.destroyed {
                tracing::warn!("add_widget on destroyed grid ignored");
                return spec;
            }
            state.place(spec)
        };
        tracing::trace!(id = ?placed.id, x = ?placed.x, y = ?placed.y, "widget added");
        self.fire(GridEvent::Added);
        placed
    }

    fn save(&self) -> SavedLayout {
        let state = self.state();
        if state.save_options {
            SavedLayout::Options(state.options.clone())
        } else {
            SavedLayout::Widgets(Arrangement::new(state.widgets.clone()))
        }
    }

    fn load(&mut self, arrangement: &Arrangement) {
        let added = {
            let mut state = self.state();
            state.calls.load += 1;
            if state.destroyed {
                tracing::warn!("load on destroyed grid ignored");
                return;
            }
            for spec in arrangement {
                state.place(spec.clone());
            }
            !arrangement.is_empty()
        };
        if added {
            self.fire(GridEvent::Added);
        }
    }

    fn remove_all(&mut self) {
        let removed = {
            let mut state = self.state();
            state.calls.remove_all += 1;
            if state.destroyed {
                tracing::warn!("remove_all on destroyed grid ignored");
                return;
            }
            let removed = !state.widgets.is_empty();
            state.widgets.clear();
            state.selected = None;
            removed
        };
        if removed {
            self.fire(GridEvent::Removed);
        }
    }

    fn on(&mut self, events: &[GridEvent], handler: EventHandler) {
        let mut state = self.state();
        state.calls.on += 1;
        if state.destroyed {
            tracing::warn!("subscription on destroyed grid ignored");
            return;
        }
        for &event in events {
            state.handlers.push((event, Arc::clone(&handler)));
        }
    }

    fn off(&mut self, events: &[GridEvent]) {
        let mut state = self.state();
        state.calls.off += 1;
        state.handlers.retain(|(event, _)| !events.contains(event));
    }

    fn set_animation(&mut self, enabled: bool) {
        let mut state = self.state();
        state.calls.set_animation += 1;
        state.options.animate = enabled;
    }

    fn animation_enabled(&self) -> bool {
        self.state().options.animate
    }

    fn destroy(&mut self, remove_container: bool) {
        let mut state = self.state();
        state.calls.destroy += 1;
        if state.destroyed {
            tracing::warn!("grid already destroyed");
            return;
        }
        state.destroyed = true;
        state.container_removed = remove_container;
        state.handlers.clear();
        state.widgets.clear();
        state.selected = None;
        tracing::debug!(container = %state.container, remove_container, "memory grid destroyed");
    }
}
