//! Application state and main event loop for the TUI.
//!
//! Manages terminal setup/teardown, panic hooks, the deferred grid mount and
//! the core render loop.

mod update;

use crate::engine::{GridOptions, MemoryGrid};
use crate::layout::WidgetSpec;
use crate::status::LayoutStatus;
use crate::tui::event::{handle_key_event, Event, EventHandler};
use crate::tui::ui::render_dashboard;
use crate::view::{DashboardView, MountTicket};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use local_kv::KeyValueStore;
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// How long a toolbar message stays in the footer.
const MESSAGE_TTL: Duration = Duration::from_secs(2);

/// Main application state for the TUI.
pub struct App<S: KeyValueStore> {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Counter incremented on each tick event.
    pub tick_count: u64,
    /// Transient message shown in the footer, with its expiry.
    pub status_message: Option<(String, Instant)>,
    view: DashboardView<S, MemoryGrid>,
    /// Handle to the mounted grid, used for rendering and for tile edits.
    grid: Option<MemoryGrid>,
    options: GridOptions,
    tick_rate: Duration,
}

impl<S: KeyValueStore> App<S> {
    /// Creates an application around `view`. The grid is built with
    /// `options` once the event loop starts.
    pub fn new(
        view: DashboardView<S, MemoryGrid>,
        options: GridOptions,
        tick_rate: Duration,
    ) -> Self {
        Self {
            should_quit: false,
            tick_count: 0,
            status_message: None,
            view,
            grid: None,
            options,
            tick_rate,
        }
    }

    /// The hosting view.
    pub fn view(&self) -> &DashboardView<S, MemoryGrid> {
        &self.view
    }

    /// Grid options engines are built with.
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Whether a grid is mounted.
    pub fn is_mounted(&self) -> bool {
        self.grid.is_some() && self.view.controller().is_attached()
    }

    /// Current status signal.
    pub fn status(&self) -> LayoutStatus {
        self.view.status()
    }

    /// Tiles of the mounted grid, in order. Empty when nothing is mounted.
    pub fn widgets(&self) -> Vec<WidgetSpec> {
        self.grid.as_ref().map(MemoryGrid::widgets).unwrap_or_default()
    }

    /// Identifier of the selected tile.
    pub fn selected(&self) -> Option<String> {
        self.grid.as_ref().and_then(MemoryGrid::selected)
    }

    /// Mounts `engine` through the view. The app keeps a handle for
    /// rendering only if the mount went through.
    pub fn mount(&mut self, ticket: MountTicket, engine: MemoryGrid) -> bool {
        let handle = engine.clone();
        if !self.view.mount(ticket, engine) {
            return false;
        }
        self.grid = Some(handle);
        true
    }

    /// Tears the grid down and forgets the handle. Idempotent.
    pub fn unmount(&mut self) {
        self.view.unmount();
        self.grid = None;
    }

    /// Sets the footer message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now() + MESSAGE_TTL));
    }

    /// Clears the status message if its expiry time has passed.
    pub fn expire_status_message(&mut self) {
        if let Some((_, expiry)) = &self.status_message {
            if Instant::now() >= *expiry {
                self.status_message = None;
            }
        }
    }

    /// Runs the TUI application: sets up terminal, enters event loop, restores on exit.
    pub async fn run(&mut self) -> io::Result<()> {
        // Install panic hook that restores terminal before printing panic info
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;
        self.unmount();

        restore_terminal()?;
        result
    }

    /// Main event loop: mounts the grid once it is built, renders, runs
    /// per-frame work and processes events.
    async fn event_loop(&mut self) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let event_handler = EventHandler::new(self.tick_rate);
        let mut reader = EventStream::new();

        // Build the grid off the render path; the ticket decides whether
        // the view still wants it when it arrives.
        let mut pending = Some(self.view.mount_ticket());
        let (engine_tx, mut engine_rx) = oneshot::channel();
        let options = self.options.clone();
        let container = self.view.container().clone();
        tokio::spawn(async move {
            let _ = engine_tx.send(MemoryGrid::new(options, container));
        });

        loop {
            if let Some(ticket) = pending.take() {
                match engine_rx.try_recv() {
                    Ok(engine) => {
                        self.mount(ticket, engine);
                    }
                    Err(oneshot::error::TryRecvError::Empty) => pending = Some(ticket),
                    Err(oneshot::error::TryRecvError::Closed) => {
                        tracing::warn!("grid construction was abandoned");
                    }
                }
            }

            terminal.draw(|frame| render_dashboard(frame, self))?;
            self.view.on_frame();

            match event_handler.next(&mut reader).await? {
                Event::Key(key) => {
                    self.apply_action(handle_key_event(key));
                    if self.should_quit {
                        return Ok(());
                    }
                }
                Event::Tick => {
                    self.tick_count += 1;
                    self.expire_status_message();
                }
                Event::Resize(_, _) => {}
            }
        }
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests;
