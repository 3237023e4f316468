//! Persistence adapter for the dashboard layout.
//!
//! `LayoutStore` owns one fixed key in a [`KeyValueStore`] and marshals an
//! [`Arrangement`] to and from its JSON string form. Reads are forgiving:
//! a missing value, a value that is not JSON, a JSON value that is not an
//! array, or an array of malformed tiles all read as "no saved layout".
//! [`LayoutStore::inspect`] keeps those cases apart for diagnostics.

use crate::layout::Arrangement;
use local_kv::{KeyValueStore, StoreError};
use serde_json::Value;
use thiserror::Error;

/// Key the dashboard layout is stored under.
pub const STORAGE_KEY: &str = "dashboard-grid-layout";

/// What is currently stored under the layout key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredLayout {
    /// Nothing stored.
    Missing,
    /// The store itself failed to read.
    Unreadable(String),
    /// Stored text is not valid JSON, or the array holds malformed tiles.
    Malformed(String),
    /// Stored JSON is valid but not an array.
    NotASequence,
    /// A well-formed arrangement.
    Found(Arrangement),
}

impl StoredLayout {
    /// The arrangement, if one was found.
    pub fn into_arrangement(self) -> Option<Arrangement> {
        match self {
            StoredLayout::Found(arrangement) => Some(arrangement),
            _ => None,
        }
    }

    /// Short description used by logs and the CLI.
    pub fn describe(&self) -> String {
        match self {
            StoredLayout::Missing => "no saved layout".to_string(),
            StoredLayout::Unreadable(reason) => format!("saved layout unreadable: {reason}"),
            StoredLayout::Malformed(reason) => format!("saved layout malformed: {reason}"),
            StoredLayout::NotASequence => "saved layout is not a list".to_string(),
            StoredLayout::Found(arrangement) => {
                format!("saved layout with {} widget(s)", arrangement.len())
            }
        }
    }
}

/// Failure to persist or clear the layout.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The key-value store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The arrangement could not be encoded.
    #[error("failed to serialize layout: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Round-trips one arrangement under one key.
#[derive(Debug, Clone)]
pub struct LayoutStore<S> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> LayoutStore<S> {
    /// Creates a store using [`STORAGE_KEY`].
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, STORAGE_KEY)
    }

    /// Creates a store using a custom key.
    pub fn with_key(kv: S, key: &str) -> Self {
        Self {
            kv,
            key: key.to_string(),
        }
    }

    /// The key this store owns.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying key-value store.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Reads and classifies the stored value.
    pub fn inspect(&self) -> StoredLayout {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredLayout::Missing,
            Err(e) => return StoredLayout::Unreadable(e.to_string()),
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => return StoredLayout::Malformed(e.to_string()),
        };
        if !value.is_array() {
            return StoredLayout::NotASequence;
        }

        let arrangement: Arrangement = match serde_json::from_value(value) {
            Ok(arrangement) => arrangement,
            Err(e) => return StoredLayout::Malformed(e.to_string()),
        };
        match arrangement.validate() {
            Ok(()) => StoredLayout::Found(arrangement),
            Err(e) => StoredLayout::Malformed(e.to_string()),
        }
    }

    /// Reads the stored arrangement.
    ///
    /// Returns `None` when nothing usable is stored; the reason is logged,
    /// never returned.
    pub fn load(&self) -> Option<Arrangement> {
        match self.inspect() {
            StoredLayout::Found(arrangement) => Some(arrangement),
            StoredLayout::Missing => {
                tracing::debug!(key = %self.key, "no saved layout");
                None
            }
            other => {
                tracing::warn!(key = %self.key, "{}, ignoring it", other.describe());
                None
            }
        }
    }

    /// Serializes and writes `arrangement`, replacing any previous value.
    pub fn save(&self, arrangement: &Arrangement) -> Result<(), PersistError> {
        let json = serde_json::to_string(arrangement)?;
        self.kv.set(&self.key, &json)?;
        tracing::info!(key = %self.key, widgets = arrangement.len(), "layout saved");
        Ok(())
    }

    /// Removes the stored value. No-op if absent.
    pub fn clear(&self) -> Result<(), PersistError> {
        self.kv.remove(&self.key)?;
        tracing::info!(key = %self.key, "saved layout cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{default_arrangement, WidgetSpec};
    use local_kv::MemoryStore;

    fn four_tiles() -> Arrangement {
        let mut widgets = default_arrangement().into_inner();
        widgets.push(WidgetSpec::placed("widget-1", 0, 2, 3, 2, "widget-1"));
        Arrangement::new(widgets)
    }

    #[test]
    fn test_save_then_load_roundtrips_in_order() {
        let store = LayoutStore::new(MemoryStore::new());
        let layout = four_tiles();
        store.save(&layout).expect("save");
        assert_eq!(store.load(), Some(layout));
    }

    #[test]
    fn test_load_on_empty_store_is_none() {
        let store = LayoutStore::new(MemoryStore::new());
        assert_eq!(store.inspect(), StoredLayout::Missing);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_invalid_json_reads_as_absent() {
        let kv = MemoryStore::new();
        kv.set(STORAGE_KEY, "[{not json").expect("set");
        let store = LayoutStore::new(kv);
        assert!(matches!(store.inspect(), StoredLayout::Malformed(_)));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_single_object_reads_as_absent() {
        let kv = MemoryStore::new();
        kv.set(STORAGE_KEY, r#"{"id":"a","x":0,"y":0,"w":4,"h":2}"#)
            .expect("set");
        let store = LayoutStore::new(kv);
        assert_eq!(store.inspect(), StoredLayout::NotASequence);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_scalars_read_as_not_a_sequence() {
        for raw in ["42", "\"text\"", "null", "true"] {
            let kv = MemoryStore::new();
            kv.set(STORAGE_KEY, raw).expect("set");
            assert_eq!(LayoutStore::new(kv).inspect(), StoredLayout::NotASequence);
        }
    }

    #[test]
    fn test_array_of_wrong_elements_reads_as_absent() {
        let kv = MemoryStore::new();
        kv.set(STORAGE_KEY, "[1, 2, 3]").expect("set");
        let store = LayoutStore::new(kv);
        assert!(matches!(store.inspect(), StoredLayout::Malformed(_)));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_duplicate_ids_read_as_absent() {
        let kv = MemoryStore::new();
        kv.set(
            STORAGE_KEY,
            r#"[{"id":"a","x":0,"y":0,"w":1,"h":1},{"id":"a","x":1,"y":0,"w":1,"h":1}]"#,
        )
        .expect("set");
        let store = LayoutStore::new(kv);
        match store.inspect() {
            StoredLayout::Malformed(reason) => assert!(reason.contains("duplicate")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_array_is_a_valid_layout() {
        let kv = MemoryStore::new();
        kv.set(STORAGE_KEY, "[]").expect("set");
        assert_eq!(LayoutStore::new(kv).load(), Some(Arrangement::default()));
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let store = LayoutStore::new(MemoryStore::new());
        store.save(&four_tiles()).expect("save");
        store.save(&default_arrangement()).expect("save");
        assert_eq!(store.load(), Some(default_arrangement()));
    }

    #[test]
    fn test_clear_removes_key_and_is_idempotent() {
        let kv = MemoryStore::new();
        let store = LayoutStore::new(kv.clone());
        store.save(&four_tiles()).expect("save");
        store.clear().expect("clear");
        assert_eq!(kv.get(STORAGE_KEY).expect("get"), None);
        store.clear().expect("second clear is a no-op");
    }

    #[test]
    fn test_custom_key_is_isolated() {
        let kv = MemoryStore::new();
        let main = LayoutStore::new(kv.clone());
        let other = LayoutStore::with_key(kv.clone(), "other-layout");
        other.save(&four_tiles()).expect("save");
        assert_eq!(main.load(), None);
        assert_eq!(other.key(), "other-layout");
        assert_eq!(kv.keys(), vec!["other-layout"]);
    }

    #[test]
    fn test_describe_mentions_widget_count() {
        let found = StoredLayout::Found(four_tiles());
        assert_eq!(found.describe(), "saved layout with 4 widget(s)");
        assert_eq!(StoredLayout::Missing.describe(), "no saved layout");
    }
}
