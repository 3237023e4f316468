//! Tests for the LayoutController module.
//!
//! Tests are organized into categories:
//! - `lifecycle`: attach, destroy and handle replacement
//! - `commands`: add, save, load and reset
//! - `animation`: deferred animation restore and its identity guard
//! - `scenario`: end-to-end sessions across remounts


use super::LayoutController;
use crate::engine::{GridContainer, GridOptions, MemoryGrid};
use crate::status::{LayoutStatus, StatusObserver};
use crate::store::LayoutStore;
use local_kv::MemoryStore;
use std::sync::{Arc, Mutex};

/// Records every status the controller emits.
#[derive(Clone, Default)]
pub(super) struct Statuses(Arc<Mutex<Vec<LayoutStatus>>>);

impl Statuses {
    pub(super) fn observer(&self) -> impl StatusObserver + 'static {
        let sink = Arc::clone(&self.0);
        move |status: LayoutStatus| sink.lock().expect("lock").push(status)
    }

    pub(super) fn all(&self) -> Vec<LayoutStatus> {
        self.0.lock().expect("lock").clone()
    }

    pub(super) fn last(&self) -> Option<LayoutStatus> {
        self.0.lock().expect("lock").last().copied()
    }

    pub(super) fn clear(&self) {
        self.0.lock().expect("lock").clear();
    }
}

/// Helper function to create a fresh engine on a 12-column container.
pub(super) fn new_grid() -> MemoryGrid {
    MemoryGrid::new(GridOptions::default(), GridContainer::new("dashboard", 12))
}

/// Helper function to create an unattached controller over `kv`.
pub(super) fn controller(
    kv: &MemoryStore,
) -> (LayoutController<MemoryStore, MemoryGrid>, Statuses) {
    let statuses = Statuses::default();
    let controller = LayoutController::new(LayoutStore::new(kv.clone()), statuses.observer());
    (controller, statuses)
}

/// Helper function to create a controller already attached to a fresh engine.
///
/// Returns a second handle to the engine for driving user-style edits.
pub(super) fn attached(
    kv: &MemoryStore,
) -> (LayoutController<MemoryStore, MemoryGrid>, MemoryGrid, Statuses) {
    let (mut controller, statuses) = controller(kv);
    let grid = new_grid();
    controller.attach(grid.clone());
    statuses.clear();
    (controller, grid, statuses)
}
