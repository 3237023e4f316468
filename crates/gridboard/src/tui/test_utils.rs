//! Shared test utilities for TUI testing with ratatui TestBackend.
//!
//! Provides helper functions for creating test terminals, extracting buffer
//! content, asserting colors, and building apps with or without a mounted
//! grid.

#![cfg(test)]

use crate::engine::{GridContainer, GridOptions, MemoryGrid};
use crate::tui::app::App;
use crate::view::DashboardView;
use local_kv::MemoryStore;
use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};
use std::time::Duration;

/// Creates a Terminal with TestBackend at the specified dimensions.
pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("failed to create test terminal")
}

/// Extracts all text from a specific row in the buffer as a single String.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if row >= area.height {
        return String::new();
    }
    (0..area.width)
        .map(|col| {
            buffer
                .cell((col, row))
                .map(|cell| cell.symbol())
                .unwrap_or(" ")
        })
        .collect()
}

/// Checks if a specific row contains the given substring.
pub fn row_contains(buffer: &Buffer, row: u16, text: &str) -> bool {
    row_text(buffer, row).contains(text)
}

/// Finds the first row index that contains the given text, or None if not found.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    let area = buffer.area();
    (0..area.height).find(|&row| row_contains(buffer, row, text))
}

/// Asserts that the cell at (col, row) has the specified foreground color.
pub fn assert_fg_color(buffer: &Buffer, col: u16, row: u16, color: Color) {
    let cell = buffer
        .cell((col, row))
        .unwrap_or_else(|| panic!("cell at ({}, {}) does not exist", col, row));
    assert_eq!(
        cell.fg, color,
        "expected fg color {:?} at ({}, {}), got {:?}",
        color, col, row, cell.fg
    );
}

/// Creates an app over an empty in-memory store, with no grid mounted.
pub fn make_app() -> App<MemoryStore> {
    make_app_with_store(MemoryStore::new())
}

/// Creates an app over `kv`, with no grid mounted.
pub fn make_app_with_store(kv: MemoryStore) -> App<MemoryStore> {
    let view = DashboardView::new(kv, GridContainer::new("dashboard", 12));
    App::new(view, GridOptions::default(), Duration::from_millis(250))
}

/// Creates an app and mounts a fresh grid. Returns the app and a handle to
/// the grid.
pub fn mounted_app() -> (App<MemoryStore>, MemoryGrid) {
    let mut app = make_app();
    let grid = MemoryGrid::new(GridOptions::default(), app.view().container().clone());
    let ticket = app.view().mount_ticket();
    assert!(app.mount(ticket, grid.clone()), "mount failed");
    (app, grid)
}

/// Renders the full dashboard to a buffer and returns the buffer for inspection.
pub fn render_dashboard_to_buffer(app: &App<MemoryStore>, width: u16, height: u16) -> Buffer {
    let mut terminal = test_terminal(width, height);
    terminal
        .draw(|frame| {
            crate::tui::ui::render_dashboard(frame, app);
        })
        .expect("draw failed");
    terminal.backend().buffer().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_terminal_creates_terminal() {
        let terminal = test_terminal(80, 24);
        let size = terminal.size().expect("should have size");
        assert_eq!(size.width, 80);
        assert_eq!(size.height, 24);
    }

    #[test]
    fn test_row_text_extracts_row_content() {
        let mut terminal = test_terminal(20, 5);
        terminal
            .draw(|frame| {
                let area = frame.area();
                let para = ratatui::widgets::Paragraph::new("Hello World");
                frame.render_widget(para, area);
            })
            .expect("draw failed");
        let buffer = terminal.backend().buffer();
        assert!(row_text(buffer, 0).contains("Hello World"));
        assert_eq!(row_text(buffer, 9), "");
        assert_eq!(find_row_with_text(buffer, "World"), Some(0));
        assert_eq!(find_row_with_text(buffer, "Missing"), None);
    }

    #[test]
    fn test_mounted_app_shows_default_layout() {
        let (app, grid) = mounted_app();
        assert!(app.is_mounted());
        assert_eq!(grid.len(), 3);
    }
}
