//! Shared-file access check.
//!
//! A shared link names a file by id. The store is the only authority on
//! whether it may be shown: the record must exist and be public.

use records::{FileId, RuntimeFileRecord};
use thiserror::Error;

use super::store::FileStore;
use crate::storage::DurableStorage;

/// Why a shared link cannot be shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// No record has this id.
    #[error("file not found: {0}")]
    NotFound(FileId),

    /// The record exists but is private.
    #[error("access denied: file {0} is private")]
    Private(FileId),
}

/// Resolves a shared link to its record.
pub fn resolve_shared<'a, S: DurableStorage>(
    store: &'a FileStore<S>,
    id: &FileId,
) -> Result<&'a RuntimeFileRecord, ShareError> {
    let record = store
        .get(id)
        .ok_or_else(|| ShareError::NotFound(id.clone()))?;

    if !record.is_public() {
        tracing::debug!("Denied shared access to private file {}", id);
        return Err(ShareError::Private(id.clone()));
    }

    Ok(record)
}
