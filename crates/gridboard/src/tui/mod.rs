//! TUI module for the grid dashboard.
//!
//! Provides a terminal user interface built on ratatui and crossterm: a
//! toolbar of layout commands above a grid canvas, with the latest layout
//! status in the footer.

pub mod app;
pub mod event;
pub mod ui;

#[cfg(test)]
mod test_utils;
