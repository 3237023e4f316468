//! Edge case tests
//!
//! Tests corrupt files, missing data and odd keys
//! Validates that stores never guess at malformed input

use local_kv::{FileStore, KeyValueStore, MemoryStore, StoreError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_non_utf8_file_is_io_error() {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("layout"), [0xff, 0xfe, 0x00, 0x80]).expect("Write failed");
    let store = FileStore::new(dir.path());

    match store.get("layout") {
        Err(StoreError::Io { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_empty_value_is_stored_not_removed() {
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::new(dir.path());
    store.set("layout", "").expect("Set should succeed");
    assert_eq!(store.get("layout").expect("Get").as_deref(), Some(""));

    let memory = MemoryStore::new();
    memory.set("layout", "").expect("Set should succeed");
    assert_eq!(memory.get("layout").expect("Get").as_deref(), Some(""));
}

#[test]
fn test_stray_temp_files_are_not_values() {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("layout.tmp.20260101-000000"), "stale").expect("Write failed");
    let store = FileStore::new(dir.path());
    assert_eq!(store.get("layout").expect("Get"), None);
}

#[test]
fn test_invalid_key_fails_every_operation() {
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::new(dir.path());
    assert!(matches!(store.get("a/b"), Err(StoreError::InvalidKey(_))));
    assert!(matches!(store.set("a/b", "x"), Err(StoreError::InvalidKey(_))));
    assert!(matches!(store.remove("a/b"), Err(StoreError::InvalidKey(_))));
}

#[test]
fn test_store_usable_as_trait_object() {
    let dir = tempdir().expect("Failed to create temp directory");
    let stores: Vec<Box<dyn KeyValueStore>> = vec![
        Box::new(MemoryStore::new()),
        Box::new(FileStore::new(dir.path())),
    ];
    for store in &stores {
        store.set("k", "v").expect("Set should succeed");
        assert_eq!(store.get("k").expect("Get").as_deref(), Some("v"));
    }
}
