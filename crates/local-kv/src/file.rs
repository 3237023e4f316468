//! File-backed store backend
//!
//! Each key is stored as its own file under the store directory. Writes use
//! the atomic pattern:
//! 1. Write to a temp file with a unique suffix (timestamp, process id and
//!    a per-process sequence number)
//! 2. Fsync to disk
//! 3. Rename temp over the value file
//!
//! On failure before the rename, the temp file is preserved as a safety copy.

use crate::error::{Result, StoreError};
use crate::KeyValueStore;
use chrono::Local;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number for temp files written by this process.
static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Whether `key` can name a [`FileStore`] value.
///
/// Keys are non-empty, not `.` or `..`, and use only ASCII letters, digits,
/// `.`, `_` and `-`, so a key can never escape the store directory.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Key-value store persisting each key as a file in one directory.
///
/// Keys must pass [`is_valid_key`]. The directory is created lazily on the
/// first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. Does not touch the filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the value files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` if the key is empty, `.`/`..`, or
    /// contains characters outside `[A-Za-z0-9._-]`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }

    /// Temp file for one write of `key`. Concurrent writers in this or any
    /// other process never share a name.
    fn temp_path_for(&self, key: &str) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d-%H%M%S%.f");
        let pid = std::process::id();
        let seq = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!("{key}.tmp.{timestamp}.{pid}.{seq}"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let temp_path = self.temp_path_for(key);

        fs::write(&temp_path, value).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;

        // Fsync (ensure data is on disk)
        let file = fs::File::open(&temp_path).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &path).map_err(|e| {
            log::warn!(
                "atomic rename failed for {}: {e}; safety copy kept at {}",
                path.display(),
                temp_path.display()
            );
            StoreError::WriteAtomic {
                path: path.clone(),
                temp_path: temp_path.clone(),
            }
        })?;

        log::debug!("file store: wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("file store: removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}
