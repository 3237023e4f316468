//! Error types for local-kv
//!
//! One enum covers every store backend. Callers that only care about
//! "did it work" can treat any variant as a failed operation.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key cannot be mapped to a storage location
    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),

    /// I/O error reading or writing a value
    #[error("Store I/O failed at {path}")]
    Io {
        /// File the operation touched
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the temporary file over the value file
    #[error("Failed to write value atomically: {path} - Safety copy at: {temp_path}")]
    WriteAtomic {
        /// Path to the value file
        path: PathBuf,
        /// Path to the temporary safety copy
        temp_path: PathBuf,
    },

    /// A writer panicked while holding the in-memory lock
    #[error("Store lock poisoned")]
    Poisoned,
}
