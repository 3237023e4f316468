//! Synchronous string key-value stores
//!
//! This crate provides the small persistence surface a local application
//! needs for "remember this between runs" state: get, set and remove a
//! string value by string key. Two backends are provided:
//!
//! - [`MemoryStore`]: process-local map. Clones share the same map, so two
//!   components holding a clone observe each other's writes.
//! - [`FileStore`]: one file per key under a directory, written with a
//!   temp-file-then-rename sequence so a crash never leaves a half-written
//!   value behind.
//!
//! # Examples
//!
//! ```
//! use local_kv::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("theme", "dark").unwrap();
//! assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
//!
//! store.remove("theme").unwrap();
//! assert_eq!(store.get("theme").unwrap(), None);
//! ```

#![warn(missing_docs)]

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::{is_valid_key, FileStore};
pub use memory::MemoryStore;

use std::sync::Arc;

/// A synchronous string key-value store.
///
/// Every operation touches exactly one key and is all-or-nothing from the
/// caller's point of view. Removing an absent key is not an error.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. No-op if absent.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<S: KeyValueStore>(store: S) {
        store.set("k", "v").expect("set should succeed");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v"));
        store.remove("k").expect("remove should succeed");
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[test]
    fn test_reference_forwards_to_store() {
        let store = MemoryStore::new();
        roundtrip(&store);
    }

    #[test]
    fn test_arc_forwards_to_store() {
        roundtrip(Arc::new(MemoryStore::new()));
    }

    #[test]
    fn test_boxed_trait_object_forwards_to_store() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        roundtrip(store);
    }
}
