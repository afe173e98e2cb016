//! In-memory durable storage.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{check_key, DurableStorage, StorageError, StorageResult};

/// Storage that lives as long as the value itself.
///
/// Share one instance between store generations (by reference) to
/// simulate a reload without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(context: &str) -> StorageError {
    StorageError::LockPoisoned {
        context: context.to_string(),
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        check_key(key)?;
        let entries = self.entries.read().map_err(|_| poisoned("get_item"))?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        check_key(key)?;
        let mut entries = self.entries.write().map_err(|_| poisoned("set_item"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        check_key(key)?;
        let mut entries = self.entries.write().map_err(|_| poisoned("remove_item"))?;
        entries.remove(key);
        Ok(())
    }
}
