//! Built-in layout preset.
//!
//! The default arrangement is shown whenever no valid saved arrangement
//! exists: on first start, after a reset, and when the saved value is
//! corrupt. Three equal tiles side by side across a 12-column grid.

use super::widget::{Arrangement, WidgetSpec};

/// Column count the default arrangement is designed for.
pub const DEFAULT_COLUMNS: u32 = 12;

/// Returns the fixed fallback arrangement: tiles `A`, `B`, `C`.
pub fn default_arrangement() -> Arrangement {
    Arrangement::new(vec![
        WidgetSpec::placed("a", 0, 0, 4, 2, "A"),
        WidgetSpec::placed("b", 4, 0, 4, 2, "B"),
        WidgetSpec::placed("c", 8, 0, 4, 2, "C"),
    ])
}
