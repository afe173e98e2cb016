//! The file record store.
//!
//! [`FileStore`] owns the collection of file records for the current user.
//! It is initialised from durable storage when opened and writes a fresh
//! snapshot after every mutation. Only the durable projection of each
//! record is written; content handles and preview references stay in
//! memory and are released when their record is removed or the store is
//! dropped.

use records::{
    ContentHandle, FileId, NewFile, PersistableFileRecord, RecordError, RuntimeFileRecord,
    Snapshot,
};
use thiserror::Error;

use super::previews::PreviewRegistry;
use crate::config::DEFAULT_ENTRY_NAME;
use crate::storage::{DurableStorage, StorageError};

/// Errors from an explicit [`FileStore::save`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] RecordError),

    /// The storage backend rejected the write.
    #[error("failed to write snapshot: {0}")]
    Storage(#[from] StorageError),
}

/// Single-user collection of file records, in insertion order.
pub struct FileStore<S: DurableStorage> {
    /// Backend holding the snapshot.
    storage: S,
    /// Entry name of the snapshot.
    key: String,
    /// The records, oldest first.
    files: Vec<RuntimeFileRecord>,
    /// Live preview references owned by the records above.
    previews: PreviewRegistry,
}

impl<S: DurableStorage> FileStore<S> {
    /// Opens the store, restoring records from the `key` entry of `storage`.
    ///
    /// A missing entry starts an empty store. An unreadable or corrupt
    /// entry also starts an empty store; the next mutation overwrites it.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let files = restore(&storage, &key);

        Self {
            storage,
            key,
            files,
            previews: PreviewRegistry::new(),
        }
    }

    /// Opens the store on the default `file-storage` entry.
    pub fn with_default_key(storage: S) -> Self {
        Self::open(storage, DEFAULT_ENTRY_NAME)
    }

    /// Appends a new record and returns its id.
    ///
    /// The record gets a fresh id and the current time. If the upload
    /// carries content, a preview reference is minted for it.
    pub fn add(&mut self, upload: NewFile) -> FileId {
        let preview_url = upload
            .content
            .as_ref()
            .map(|content| self.previews.create(content));
        let record = RuntimeFileRecord::create(upload, preview_url);
        let id = record.id().clone();

        tracing::info!(
            "Adding file {} ({:?}, {} bytes, {:?})",
            id,
            record.name(),
            record.size(),
            record.mime_type()
        );

        self.files.push(record);
        self.persist();
        id
    }

    /// Deletes a record and releases its preview reference.
    ///
    /// Returns the durable fields of the removed record, or `None` if no
    /// record has this id.
    pub fn remove(&mut self, id: &FileId) -> Option<PersistableFileRecord> {
        let index = match self.position(id) {
            Some(index) => index,
            None => {
                tracing::debug!("Remove ignored, file {} not found", id);
                return None;
            }
        };

        let mut record = self.files.remove(index);
        if let Some(url) = record.take_preview_url() {
            self.previews.revoke(&url);
        }

        tracing::info!("Removed file {} ({:?})", record.id(), record.name());
        self.persist();
        Some(record.to_persistable())
    }

    /// Flips the visibility of a record.
    ///
    /// Returns the new visibility, or `None` if no record has this id.
    pub fn toggle_public(&mut self, id: &FileId) -> Option<bool> {
        let record = match self.files.iter_mut().find(|f| f.id() == id) {
            Some(record) => record,
            None => {
                tracing::debug!("Toggle ignored, file {} not found", id);
                return None;
            }
        };

        let is_public = record.toggle_public();
        tracing::info!(
            "File {} ({:?}) is now {}",
            record.id(),
            record.name(),
            if is_public { "public" } else { "private" }
        );

        self.persist();
        Some(is_public)
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &FileId) -> Option<&RuntimeFileRecord> {
        self.files.iter().find(|f| f.id() == id)
    }

    /// All records, in insertion order.
    pub fn list(&self) -> &[RuntimeFileRecord] {
        &self.files
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolves the live preview of a record to its content.
    ///
    /// Restored records never have one.
    pub fn preview_content(&self, id: &FileId) -> Option<ContentHandle> {
        let url = self.get(id)?.preview_url()?;
        self.previews.resolve(url)
    }

    /// Number of preview references currently held.
    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }

    /// The durable projection of the whole collection.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.files.iter().map(|f| f.to_persistable()).collect())
    }

    /// Writes the snapshot to durable storage.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = self.snapshot().to_json()?;
        self.storage.set_item(&self.key, &json)?;
        tracing::debug!("Saved {} files to entry {:?}", self.files.len(), self.key);
        Ok(())
    }

    /// Entry name of the snapshot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn position(&self, id: &FileId) -> Option<usize> {
        self.files.iter().position(|f| f.id() == id)
    }

    /// Saves after a mutation. A failed write keeps the in-memory state.
    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("Failed to persist file store to {:?}: {}", self.key, e);
        }
    }
}

impl<S: DurableStorage> Drop for FileStore<S> {
    fn drop(&mut self) {
        self.previews.revoke_all();
    }
}

/// Reads the snapshot entry. Every failure degrades to an empty collection.
fn restore<S: DurableStorage>(storage: &S, key: &str) -> Vec<RuntimeFileRecord> {
    let json = match storage.get_item(key) {
        Ok(Some(json)) => json,
        Ok(None) => {
            tracing::debug!("No snapshot in entry {:?}, starting empty", key);
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Failed to read snapshot {:?}, starting empty: {}", key, e);
            return Vec::new();
        }
    };

    let snapshot = match Snapshot::from_json(&json) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("Discarding corrupt snapshot {:?}: {}", key, e);
            return Vec::new();
        }
    };

    let mut files: Vec<RuntimeFileRecord> = Vec::with_capacity(snapshot.files.len());
    for meta in snapshot.files {
        if files.iter().any(|f| f.id() == &meta.id) {
            tracing::warn!("Dropping duplicate file id {} from snapshot", meta.id);
            continue;
        }
        files.push(RuntimeFileRecord::restored(meta));
    }

    tracing::info!("Loaded {} files from entry {:?}", files.len(), key);
    files
}
