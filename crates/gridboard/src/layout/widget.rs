//! Tile placement types and arrangement validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Size in cells `(w, h)` of a tile inserted by the "add widget" command.
pub const ADDED_WIDGET_SIZE: (u32, u32) = (3, 2);

/// One tile's placement and payload.
///
/// Serialized as a JSON object with keys `id`, `x`, `y`, `w`, `h`, `content`.
/// `id`, `x` and `y` are optional: a spec without an id gets one from the
/// grid engine, a spec without coordinates is auto-placed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSpec {
    /// Identifier, unique within one arrangement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Column of the left edge, in cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    /// Row of the top edge, in cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    /// Width in cells.
    #[serde(default = "one_cell")]
    pub w: u32,
    /// Height in cells.
    #[serde(default = "one_cell")]
    pub h: u32,
    /// Display payload, a plain label.
    #[serde(default)]
    pub content: String,
}

fn one_cell() -> u32 {
    1
}

impl WidgetSpec {
    /// Creates a spec with a fixed position.
    pub fn placed(id: &str, x: u32, y: u32, w: u32, h: u32, content: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            x: Some(x),
            y: Some(y),
            w,
            h,
            content: content.to_string(),
        }
    }

    /// Creates a spec the engine is free to position.
    pub fn unplaced(id: &str, w: u32, h: u32, content: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            x: None,
            y: None,
            w,
            h,
            content: content.to_string(),
        }
    }

    /// Identifier as a string slice, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Row just below the tile, treating a missing `y` as row 0.
    pub fn bottom(&self) -> u32 {
        self.y.unwrap_or(0).saturating_add(self.h)
    }
}

/// Reasons an arrangement is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrangementError {
    /// A tile has zero width or height.
    #[error("widget at index {index} has zero size ({w}x{h})")]
    ZeroSize {
        /// Position of the tile in the arrangement.
        index: usize,
        /// Offending width.
        w: u32,
        /// Offending height.
        h: u32,
    },
    /// Two tiles share an identifier.
    #[error("duplicate widget id: {0}")]
    DuplicateId(String),
}

/// An ordered sequence of tile placements; one complete dashboard layout.
///
/// Order is creation (z) order and carries no layout meaning, but it is
/// preserved through save and load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arrangement(Vec<WidgetSpec>);

impl Arrangement {
    /// Creates an arrangement from tiles in order.
    pub fn new(widgets: Vec<WidgetSpec>) -> Self {
        Self(widgets)
    }

    /// The tiles, in order.
    pub fn widgets(&self) -> &[WidgetSpec] {
        &self.0
    }

    /// Count of tiles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the arrangement has no tiles.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tiles in order.
    pub fn iter(&self) -> std::slice::Iter<'_, WidgetSpec> {
        self.0.iter()
    }

    /// Identifiers of the tiles that have one, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().filter_map(WidgetSpec::id).collect()
    }

    /// Looks up a tile by identifier.
    pub fn get(&self, id: &str) -> Option<&WidgetSpec> {
        self.0.iter().find(|w| w.id() == Some(id))
    }

    /// Consumes the arrangement, returning its tiles.
    pub fn into_inner(self) -> Vec<WidgetSpec> {
        self.0
    }

    /// Checks the invariants every stored or loaded arrangement must hold:
    /// positive sizes and unique identifiers.
    pub fn validate(&self) -> Result<(), ArrangementError> {
        let mut seen = HashSet::new();
        for (index, widget) in self.0.iter().enumerate() {
            if widget.w == 0 || widget.h == 0 {
                return Err(ArrangementError::ZeroSize {
                    index,
                    w: widget.w,
                    h: widget.h,
                });
            }
            if let Some(id) = widget.id() {
                if !seen.insert(id) {
                    return Err(ArrangementError::DuplicateId(id.to_string()));
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<WidgetSpec>> for Arrangement {
    fn from(widgets: Vec<WidgetSpec>) -> Self {
        Self(widgets)
    }
}

impl FromIterator<WidgetSpec> for Arrangement {
    fn from_iter<I: IntoIterator<Item = WidgetSpec>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Arrangement {
    type Item = &'a WidgetSpec;
    type IntoIter = std::slice::Iter<'a, WidgetSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Arrangement {
    type Item = WidgetSpec;
    type IntoIter = std::vec::IntoIter<WidgetSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Time-based generator for `widget-<millis>` identifiers.
///
/// Identifiers are strictly increasing per generator: a second call within
/// the same millisecond (or after the clock stepped back) uses the previous
/// value plus one, so one generator never hands out the same id twice.
#[derive(Debug, Clone, Default)]
pub struct WidgetIdGenerator {
    last_millis: Option<i64>,
}

impl WidgetIdGenerator {
    /// Creates a generator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier based on the current wall clock.
    pub fn next_id(&mut self) -> String {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    /// Next identifier given `now_millis` as the current time.
    pub fn next_at(&mut self, now_millis: i64) -> String {
        let millis = match self.last_millis {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last_millis = Some(millis);
        format!("widget-{millis}")
    }
}
