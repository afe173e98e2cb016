//! Durable key/value storage.
//!
//! This module provides the persistence boundary the file store and the
//! login gate write through:
//! - [`JsonFileStorage`]: one JSON document per entry under a data directory
//! - [`MemoryStorage`]: process-local map for tests and ephemeral runs
//!
//! Values are opaque strings; callers own their encoding.

mod json_file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters outside `[A-Za-z0-9_-]` or is empty.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lock poisoned during operation.
    #[error("lock poisoned: {context}")]
    LockPoisoned { context: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// String-keyed durable storage, the analogue of a browser's local store.
pub trait DurableStorage {
    /// Returns the stored value, or `None` if the entry does not exist.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Creates or replaces an entry.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes an entry. Removing a missing entry is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<S: DurableStorage + ?Sized> DurableStorage for &S {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

/// Returns true if `key` can name a storage entry.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn check_key(key: &str) -> StorageResult<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
