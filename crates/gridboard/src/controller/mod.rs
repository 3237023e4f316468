//! Layout lifecycle controller.
//!
//! `LayoutController` is the single owner of the decision "which
//! arrangement is shown" and the only writer to the attached grid engine.
//! It resolves the initial arrangement on attach (saved layout, else the
//! default), runs the add/save/load/reset commands, and forwards engine
//! mutations to a [`StatusObserver`].
//!
//! No command returns an error. A missing engine, corrupt saved data, a
//! save result of the wrong shape and store failures are all logged and
//! absorbed; the user sees either nothing happen or the default layout.

use crate::engine::{GridEngine, GridEvent, SavedLayout, MUTATION_EVENTS};
use crate::layout::{
    default_arrangement, Arrangement, WidgetIdGenerator, WidgetSpec, ADDED_WIDGET_SIZE,
};
use crate::status::{LayoutStatus, StatusObserver};
use crate::store::LayoutStore;
use local_kv::KeyValueStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Generation value meaning "no engine attached".
const DETACHED: u64 = 0;

/// The engine handle together with the generation stamped on it at attach.
#[derive(Debug)]
struct AttachedGrid<E> {
    engine: E,
    generation: u64,
}

/// Deferred animation re-enable queued by [`LayoutController::add_widget`].
///
/// Carries the generation of the engine handle that issued it; it only acts
/// if that handle is still the attached one when the next frame runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRestore {
    generation: u64,
}

impl AnimationRestore {
    /// Generation of the engine handle that queued the restore.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// State shared with the engine subscription.
#[derive(Debug, Default)]
struct Subscription {
    /// Generation currently attached, [`DETACHED`] when none.
    current: AtomicU64,
    /// Set while the controller itself mutates the engine.
    suppressed: AtomicBool,
}

/// Resets the suppression flag when dropped.
struct Suppressed<'a>(&'a AtomicBool);

impl<'a> Suppressed<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for Suppressed<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates one grid engine against one layout store.
pub struct LayoutController<S, E> {
    store: LayoutStore<S>,
    default_layout: Arrangement,
    observer: Arc<dyn StatusObserver>,
    grid: Option<AttachedGrid<E>>,
    subscription: Arc<Subscription>,
    next_generation: u64,
    ids: WidgetIdGenerator,
    pending_restores: Vec<AnimationRestore>,
}

impl<S: KeyValueStore, E> std::fmt::Debug for LayoutController<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutController")
            .field("store_key", &self.store.key())
            .field("attached", &self.grid.as_ref().map(|g| g.generation))
            .field("pending_restores", &self.pending_restores.len())
            .finish()
    }
}

impl<S: KeyValueStore, E: GridEngine> LayoutController<S, E> {
    /// Creates an unattached controller using the built-in default layout.
    pub fn new(store: LayoutStore<S>, observer: impl StatusObserver + 'static) -> Self {
        Self {
            store,
            default_layout: default_arrangement(),
            observer: Arc::new(observer),
            grid: None,
            subscription: Arc::new(Subscription::default()),
            next_generation: DETACHED,
            ids: WidgetIdGenerator::new(),
            pending_restores: Vec::new(),
        }
    }

    /// Replaces the fallback arrangement.
    pub fn with_default_layout(mut self, layout: Arrangement) -> Self {
        self.default_layout = layout;
        self
    }

    /// The fallback arrangement.
    pub fn default_layout(&self) -> &Arrangement {
        &self.default_layout
    }

    /// The layout store.
    pub fn store(&self) -> &LayoutStore<S> {
        &self.store
    }

    /// Whether an engine is attached.
    pub fn is_attached(&self) -> bool {
        self.grid.is_some()
    }

    /// The attached engine.
    pub fn grid(&self) -> Option<&E> {
        self.grid.as_ref().map(|g| &g.engine)
    }

    /// Generation of the attached engine handle.
    pub fn generation(&self) -> Option<u64> {
        self.grid.as_ref().map(|g| g.generation)
    }

    /// Count of queued animation restores.
    pub fn pending_animation_restores(&self) -> usize {
        self.pending_restores.len()
    }

    fn emit(&self, status: LayoutStatus) {
        tracing::debug!(%status, "layout status");
        self.observer.status_changed(status);
    }

    /// Takes ownership of `engine`, shows the saved layout (or the default)
    /// and starts forwarding engine mutations as `"changed"`. Emits
    /// `"ready"`.
    ///
    /// Attaching while already attached replaces the handle; the previous
    /// engine's subscription stops reporting but it is not destroyed.
    pub fn attach(&mut self, engine: E) {
        if let Some(previous) = &self.grid {
            tracing::debug!(generation = previous.generation, "replacing attached grid");
        }
        self.next_generation += 1;
        let generation = self.next_generation;
        self.subscription.current.store(generation, Ordering::SeqCst);
        self.grid = Some(AttachedGrid { engine, generation });

        if !self.load_saved_layout() {
            self.apply_default();
        }

        let subscription = Arc::clone(&self.subscription);
        let observer = Arc::clone(&self.observer);
        let handler = Arc::new(move |event: GridEvent| {
            if subscription.current.load(Ordering::SeqCst) != generation {
                return;
            }
            if subscription.suppressed.load(Ordering::SeqCst) {
                tracing::trace!(%event, "grid event during controller mutation");
                return;
            }
            tracing::debug!(%event, "grid changed");
            observer.status_changed(LayoutStatus::Changed);
        });
        if let Some(grid) = self.grid.as_mut() {
            grid.engine.on(&MUTATION_EVENTS, handler);
        }

        tracing::info!(generation, "grid attached");
        self.emit(LayoutStatus::Ready);
    }

    /// Unsubscribes, destroys the engine (leaving its container in place)
    /// and drops the handle. No-op when unattached.
    pub fn destroy(&mut self) {
        let Some(mut grid) = self.grid.take() else {
            tracing::debug!("destroy: no grid attached");
            return;
        };
        self.subscription.current.store(DETACHED, Ordering::SeqCst);
        grid.engine.off(&MUTATION_EVENTS);
        grid.engine.destroy(false);
        tracing::info!(generation = grid.generation, "grid destroyed");
    }

    /// Inserts a `3x2` widget with a fresh `widget-<millis>` id and label,
    /// at a position of the engine's choosing. Emits `"added widget"`.
    ///
    /// If the engine animates, animation is switched off for the insert and
    /// a restore is queued for the next [`on_frame`](Self::on_frame).
    /// Returns the new widget's id.
    pub fn add_widget(&mut self) -> Option<String> {
        let Some(grid) = self.grid.as_mut() else {
            tracing::warn!("add_widget: grid not initialized");
            return None;
        };

        let id = self.ids.next_id();
        let (w, h) = ADDED_WIDGET_SIZE;
        let animated = grid.engine.animation_enabled();
        if animated {
            grid.engine.set_animation(false);
        }
        let placed = {
            let _quiet = Suppressed::new(&self.subscription.suppressed);
            grid.engine.add_widget(WidgetSpec::unplaced(&id, w, h, &id))
        };
        if animated {
            self.pending_restores.push(AnimationRestore {
                generation: grid.generation,
            });
        }

        tracing::info!(%id, x = ?placed.x, y = ?placed.y, "widget added");
        self.emit(LayoutStatus::AddedWidget);
        Some(placed.id.unwrap_or(id))
    }

    /// Runs queued animation restores. The host calls this once per display
    /// refresh. A restore whose engine handle is no longer attached is
    /// dropped. Returns how many restores re-enabled animation.
    pub fn on_frame(&mut self) -> usize {
        if self.pending_restores.is_empty() {
            return 0;
        }
        let mut applied = 0;
        for restore in std::mem::take(&mut self.pending_restores) {
            match self.grid.as_mut() {
                Some(grid) if grid.generation == restore.generation => {
                    grid.engine.set_animation(true);
                    applied += 1;
                }
                _ => {
                    tracing::debug!(
                        generation = restore.generation,
                        "skipping animation restore for a detached grid"
                    );
                }
            }
        }
        applied
    }

    /// Persists the engine's current arrangement. Emits `"saved"`.
    ///
    /// A save result that is not a valid widget list, or a store failure,
    /// aborts with a log and no status.
    pub fn save_layout(&mut self) {
        let Some(grid) = self.grid.as_ref() else {
            tracing::warn!("save_layout: grid not initialized");
            return;
        };

        let arrangement = match grid.engine.save() {
            SavedLayout::Widgets(arrangement) => arrangement,
            SavedLayout::Options(_) => {
                tracing::warn!("save_layout: engine returned options instead of widgets");
                return;
            }
        };
        if let Err(e) = arrangement.validate() {
            tracing::warn!("save_layout: engine returned an invalid arrangement: {e}");
            return;
        }
        if let Err(e) = self.store.save(&arrangement) {
            tracing::warn!("save_layout: {e}");
            return;
        }
        self.emit(LayoutStatus::Saved);
    }

    /// Applies the saved arrangement (`"loaded"`), or the default when
    /// nothing valid is saved (`"loaded default"`).
    pub fn load_layout(&mut self) {
        if self.grid.is_none() {
            tracing::warn!("load_layout: grid not initialized");
            return;
        }
        if self.load_saved_layout() {
            self.emit(LayoutStatus::Loaded);
        } else {
            self.apply_default();
            self.emit(LayoutStatus::LoadedDefault);
        }
    }

    /// Clears the saved arrangement and applies the default. Emits
    /// `"reset"`. Never reads the store.
    pub fn reset_layout(&mut self) {
        if self.grid.is_none() {
            tracing::warn!("reset_layout: grid not initialized");
            return;
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!("reset_layout: {e}");
        }
        self.apply_default();
        self.emit(LayoutStatus::Reset);
    }

    /// Applies the saved arrangement if there is one. Returns whether it did.
    fn load_saved_layout(&mut self) -> bool {
        if self.grid.is_none() {
            tracing::warn!("load_saved_layout: grid not initialized");
            return false;
        }
        match self.store.load() {
            Some(arrangement) => {
                self.apply_layout(&arrangement);
                tracing::info!(widgets = arrangement.len(), "saved layout applied");
                true
            }
            None => false,
        }
    }

    fn apply_default(&mut self) {
        let layout = self.default_layout.clone();
        self.apply_layout(&layout);
        tracing::info!(widgets = layout.len(), "default layout applied");
    }

    /// Full replace: every existing widget goes, then `arrangement` is
    /// bulk-loaded. Engine events raised meanwhile are not reported.
    fn apply_layout(&mut self, arrangement: &Arrangement) {
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        let _quiet = Suppressed::new(&self.subscription.suppressed);
        grid.engine.remove_all();
        grid.engine.load(arrangement);
    }
}
