//! Persisted snapshot layout.
//!
//! A snapshot is a single JSON object:
//!
//! ```json
//! { "version": 1, "files": [ { "id": "...", "name": "...", ... } ] }
//! ```
//!
//! `version` is optional on read so a bare `{ "files": [...] }` object
//! also loads.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::PersistableFileRecord;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Durable view of the whole file collection, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version (for future migrations).
    #[serde(default = "default_version")]
    pub version: u32,
    /// The persisted records.
    pub files: Vec<PersistableFileRecord>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Snapshot {
    /// Creates a snapshot of the current version.
    pub fn new(files: Vec<PersistableFileRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            files,
        }
    }

    /// Encodes the snapshot as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use crate::record::{NewFile, RuntimeFileRecord};

    fn record(name: &str) -> PersistableFileRecord {
        RuntimeFileRecord::create(NewFile::metadata_only(name, 1, "text/plain"), None)
            .to_persistable()
    }

    #[test]
    fn test_default_is_empty_current_version() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert!(snapshot.files.is_empty());
    }

    #[test]
    fn test_json_preserves_order() {
        let snapshot = Snapshot::new(vec![record("a"), record("b"), record("c")]);
        let restored = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();

        let names: Vec<&str> = restored.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_accepts_missing_version() {
        let snapshot = Snapshot::from_json(r#"{"files": []}"#).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn test_rejects_missing_files() {
        let err = Snapshot::from_json(r#"{"version": 1}"#).unwrap_err();
        assert!(matches!(err, RecordError::Deserialization(_)));
    }

    #[test]
    fn test_rejects_corrupt_json() {
        let err = Snapshot::from_json("{\"files\": [{\"id\": ").unwrap_err();
        assert!(matches!(err, RecordError::Deserialization(_)));
    }

    #[test]
    fn test_top_level_shape() {
        let json = Snapshot::new(vec![record("a")]).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["files"].is_array());
        assert_eq!(value["files"][0]["name"], "a");
    }
}
