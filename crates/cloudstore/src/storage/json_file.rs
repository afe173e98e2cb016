//! File-backed durable storage.
//!
//! Each entry is stored as `<data_dir>/<key>.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{check_key, DurableStorage, StorageError, StorageResult};

/// Durable storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Creates a storage rooted at `dir`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl DurableStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        check_key(key)?;
        let path = self.entry_path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Storage entry {:?} not found at {:?}", key, path);
                Ok(None)
            }
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Uses atomic write (write to temp file, then rename) to prevent corruption.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        check_key(key)?;

        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let path = self.entry_path(key);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).map_err(|e| io_error(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| io_error(&path, e))?;

        tracing::debug!("Wrote {} bytes to storage entry {:?}", value.len(), key);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        check_key(key)?;
        let path = self.entry_path(key);

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
