//! Layout data model for the dashboard grid.
//!
//! A layout is an [`Arrangement`]: an ordered list of [`WidgetSpec`] tile
//! placements. It is the unit that gets saved, loaded and reset. The built-in
//! fallback arrangement lives in [`presets`].

mod presets;
mod widget;

pub use presets::{default_arrangement, DEFAULT_COLUMNS};
pub use widget::{
    Arrangement, ArrangementError, WidgetIdGenerator, WidgetSpec, ADDED_WIDGET_SIZE,
};
