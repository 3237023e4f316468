//! Main rendering orchestration for the TUI dashboard.
//!
//! Composes the header, toolbar, grid canvas and status footer. Grid cells
//! are mapped onto terminal cells: each column is an equal share of the
//! canvas width and each row is [`ROW_HEIGHT`] lines tall.

use crate::layout::WidgetSpec;
use crate::tui::app::App;
use local_kv::KeyValueStore;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

/// Header text displayed at the top of the dashboard.
const HEADER_TEXT: &str = "Grid Dashboard";

/// Toolbar text showing the buttons and their keys.
const TOOLBAR_TEXT: &str =
    "[a] Add widget  [s] Save layout  [l] Load layout  [r] Reset layout  [g] Log grid element";

/// Keybinding hints for grid interaction.
const GRID_HINTS: &str = "[Tab] Select  [arrows] Move  [x] Remove  [q] Quit";

/// Version string shown in the header (right-aligned).
const VERSION_TEXT: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Terminal lines per grid row.
pub const ROW_HEIGHT: u16 = 3;

/// Renders the full dashboard: header, toolbar, grid canvas and footer.
pub fn render_dashboard<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // toolbar
            Constraint::Min(3),    // grid
            Constraint::Length(1), // footer
        ])
        .split(area);

    // Header with title (left) and version (right-aligned)
    let padding_len = (chunks[0].width as usize)
        .saturating_sub(HEADER_TEXT.len())
        .saturating_sub(VERSION_TEXT.len());
    let header = Paragraph::new(Line::from(vec![
        Span::styled(HEADER_TEXT, Style::default().fg(Color::Cyan)),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(VERSION_TEXT, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(header, chunks[0]);

    let toolbar = Paragraph::new(Line::from(Span::styled(
        TOOLBAR_TEXT,
        Style::default().fg(Color::White),
    )));
    frame.render_widget(toolbar, chunks[1]);

    render_grid(frame, app, chunks[2]);

    frame.render_widget(Paragraph::new(footer_line(app)), chunks[3]);
}

/// Renders the grid canvas, or a placeholder while no grid is mounted.
fn render_grid<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let title = format!(" {} ", app.view().container());
    let canvas = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let inner = canvas.inner(area);
    frame.render_widget(canvas, area);

    if !app.is_mounted() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "waiting for grid...",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(placeholder, inner);
        return;
    }

    let column = app.options().column;
    let selected = app.selected();
    for widget in app.widgets() {
        let Some(rect) = tile_rect(inner, &widget, column) else {
            continue;
        };
        let is_selected = widget.id.is_some() && widget.id == selected;
        render_tile(frame, &widget, rect, is_selected);
    }
}

fn render_tile(frame: &mut Frame, widget: &WidgetSpec, rect: Rect, selected: bool) {
    let border = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(widget.id().unwrap_or("?").to_string());
    let body = Paragraph::new(widget.content.clone()).block(block);
    frame.render_widget(body, rect);
}

/// Maps a tile's cell coordinates onto `area`, clipped to it.
///
/// Returns `None` when the tile has no position or lies entirely outside
/// the visible canvas. Stored coordinates are arbitrary `u32`s, so the
/// arithmetic runs in `u64` and saturates instead of overflowing.
pub fn tile_rect(area: Rect, widget: &WidgetSpec, column: u32) -> Option<Rect> {
    let (x, y) = (u64::from(widget.x?), u64::from(widget.y?));
    let cell_width = (u64::from(area.width) / u64::from(column.max(1))).max(1);
    let row_height = u64::from(ROW_HEIGHT);

    let left = u64::from(area.x).saturating_add(x.saturating_mul(cell_width));
    let top = u64::from(area.y).saturating_add(y.saturating_mul(row_height));
    let width = u64::from(widget.w).saturating_mul(cell_width);
    let height = u64::from(widget.h).saturating_mul(row_height);
    let right = u64::from(area.right()).min(left.saturating_add(width));
    let bottom = u64::from(area.bottom()).min(top.saturating_add(height));
    if left >= right || top >= bottom {
        return None;
    }

    Some(Rect::new(
        u16::try_from(left).ok()?,
        u16::try_from(top).ok()?,
        u16::try_from(right - left).ok()?,
        u16::try_from(bottom - top).ok()?,
    ))
}

/// Footer: the status signal, then the transient message or key hints.
fn footer_line<S: KeyValueStore>(app: &App<S>) -> Line<'static> {
    let mut spans = vec![
        Span::styled("status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.status().to_string(), Style::default().fg(Color::Green)),
        Span::raw("  "),
    ];
    match &app.status_message {
        Some((msg, expiry)) if Instant::now() < *expiry => {
            spans.push(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)));
        }
        _ => spans.push(Span::styled(GRID_HINTS, Style::default().fg(Color::DarkGray))),
    }
    Line::from(spans)
}
