//! Hosting view for the dashboard.
//!
//! `DashboardView` builds the layout store and controller, owns the grid
//! container, and runs the mount/unmount sequence. The engine is built
//! asynchronously; a disposal flag captured before that wait decides, once
//! it resolves, whether the view is still around to receive it.

use crate::controller::LayoutController;
use crate::engine::{GridContainer, GridEngine};
use crate::status::{watch_observer, LayoutStatus};
use crate::store::LayoutStore;
use local_kv::KeyValueStore;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Disposal flag captured before engine construction starts.
#[derive(Debug, Clone)]
pub struct MountTicket {
    disposed: Arc<AtomicBool>,
}

impl MountTicket {
    /// Whether the view was torn down since the ticket was taken.
    pub fn is_cancelled(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

/// Handle that marks the view as disposed from another task.
#[derive(Debug, Clone)]
pub struct Disposer {
    disposed: Arc<AtomicBool>,
}

impl Disposer {
    /// Marks the view as disposed. Pending mounts will be refused.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

/// One dashboard on screen.
pub struct DashboardView<S, E> {
    controller: LayoutController<S, E>,
    container: GridContainer,
    disposed: Arc<AtomicBool>,
    status: watch::Receiver<LayoutStatus>,
}

impl<S: KeyValueStore, E: GridEngine> DashboardView<S, E> {
    /// Creates a view storing its layout in `kv` under the default key.
    pub fn new(kv: S, container: GridContainer) -> Self {
        Self::with_store(LayoutStore::new(kv), container)
    }

    /// Creates a view over an existing layout store.
    pub fn with_store(store: LayoutStore<S>, container: GridContainer) -> Self {
        let (tx, status) = watch::channel(LayoutStatus::NotInitialized);
        Self {
            controller: LayoutController::new(store, watch_observer(tx)),
            container,
            disposed: Arc::new(AtomicBool::new(false)),
            status,
        }
    }

    /// The container engines render into.
    pub fn container(&self) -> &GridContainer {
        &self.container
    }

    /// The latest status signal.
    pub fn status(&self) -> LayoutStatus {
        *self.status.borrow()
    }

    /// A receiver that observes every future status.
    pub fn subscribe(&self) -> watch::Receiver<LayoutStatus> {
        self.status.clone()
    }

    /// The controller.
    pub fn controller(&self) -> &LayoutController<S, E> {
        &self.controller
    }

    /// Whether the view has been torn down.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Handle for tearing the view down from another task.
    pub fn disposer(&self) -> Disposer {
        Disposer {
            disposed: Arc::clone(&self.disposed),
        }
    }

    /// Captures the disposal flag. Take the ticket before starting engine
    /// construction, then pass it to [`mount`](Self::mount).
    pub fn mount_ticket(&self) -> MountTicket {
        MountTicket {
            disposed: Arc::clone(&self.disposed),
        }
    }

    /// Attaches `engine` unless the view was disposed while it was being
    /// built. Returns whether the engine was attached.
    pub fn mount(&mut self, ticket: MountTicket, engine: E) -> bool {
        if ticket.is_cancelled() {
            tracing::debug!(container = %self.container, "view disposed before grid was ready");
            return false;
        }
        self.controller.attach(engine);
        true
    }

    /// Awaits `init` and mounts the engine it produces.
    pub async fn mount_with<F>(&mut self, init: F) -> bool
    where
        F: Future<Output = E>,
    {
        let ticket = self.mount_ticket();
        let engine = init.await;
        self.mount(ticket, engine)
    }

    /// Marks the view disposed and destroys any attached engine. Idempotent.
    pub fn unmount(&mut self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.controller.destroy();
    }

    /// Runs per-frame work; call once after every redraw.
    pub fn on_frame(&mut self) {
        self.controller.on_frame();
    }

    /// "Add widget" button.
    pub fn add_widget(&mut self) -> Option<String> {
        self.controller.add_widget()
    }

    /// "Save layout" button.
    pub fn save_layout(&mut self) {
        self.controller.save_layout();
    }

    /// "Load layout" button.
    pub fn load_layout(&mut self) {
        self.controller.load_layout();
    }

    /// "Reset layout" button.
    pub fn reset_layout(&mut self) {
        self.controller.reset_layout();
    }

    /// "Log grid element" button: logs the container and its tile count,
    /// returning the same line.
    pub fn log_grid_element(&self) -> String {
        let tiles = self
            .controller
            .grid()
            .and_then(|grid| grid.save().into_arrangement())
            .map(|arrangement| arrangement.len());
        let line = match tiles {
            Some(count) => format!("{}: {count} widget(s)", self.container),
            None => format!("{}: not mounted", self.container),
        };
        tracing::info!("{line}");
        line
    }
}

impl<S, E> std::fmt::Debug for DashboardView<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardView")
            .field("container", &self.container)
            .field("disposed", &self.disposed.load(Ordering::SeqCst))
            .field("status", &*self.status.borrow())
            .finish()
    }
}
