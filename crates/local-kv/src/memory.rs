//! In-memory store backend

use crate::error::{Result, StoreError};
use crate::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Process-local key-value store.
///
/// Wraps the map in `Arc<RwLock>` so clones are cheap handles onto the same
/// data. Nothing survives process exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.values.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(key.to_string(), value.to_string());
        log::trace!("memory store: set {key} ({} bytes)", value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.values.write().map_err(|_| StoreError::Poisoned)?;
        if map.remove(key).is_some() {
            log::trace!("memory store: removed {key}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.get("missing").expect("get"), None);
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let store = MemoryStore::new();
        store.set("layout", "[1]").expect("set");
        store.set("layout", "[2]").expect("set");
        assert_eq!(store.get("layout").expect("get").as_deref(), Some("[2]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("never-set").is_ok());
    }

    #[test]
    fn test_clones_share_values() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("shared", "yes").expect("set");
        assert_eq!(other.get("shared").expect("get").as_deref(), Some("yes"));

        other.remove("shared").expect("remove");
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_are_sorted() {
        let store = MemoryStore::new();
        store.set("b", "2").expect("set");
        store.set("a", "1").expect("set");
        store.set("c", "3").expect("set");
        assert_eq!(store.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_poisoned_store_still_reports_contents() {
        let store = MemoryStore::new();
        store.set("layout", "[]").expect("set");

        let values = Arc::clone(&store.values);
        let result = std::thread::spawn(move || {
            let _guard = values.write().expect("lock");
            panic!("poison the map");
        })
        .join();
        assert!(result.is_err());
        assert!(store.values.is_poisoned());

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.keys(), vec!["layout"]);
        assert!(matches!(store.get("layout"), Err(StoreError::Poisoned)));
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStore>();
    }
}
