//! File record shapes.
//!
//! [`PersistableFileRecord`] carries the durable fields and is the only
//! shape with a serde representation. [`RuntimeFileRecord`] wraps it with
//! the ephemeral content and preview references.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{ContentHandle, PreviewUrl};
use crate::id::FileId;

/// Input to the store's add operation.
///
/// Nothing here is validated: empty names, empty MIME types and zero or
/// negative sizes are all accepted as data.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFile {
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type as reported by the selecting side; may be empty.
    pub mime_type: String,
    /// Initial visibility.
    pub is_public: bool,
    /// Bytes of the file, when the caller has them.
    pub content: Option<ContentHandle>,
}

impl NewFile {
    /// Describes a file by metadata alone, with no retrievable bytes.
    pub fn metadata_only(name: impl Into<String>, size: i64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            is_public: false,
            content: None,
        }
    }

    /// Describes a file from its content handle. Name and size are taken
    /// from the handle.
    pub fn from_content(content: ContentHandle, mime_type: impl Into<String>) -> Self {
        Self {
            name: content.name().to_string(),
            size: i64::try_from(content.len()).unwrap_or(i64::MAX),
            mime_type: mime_type.into(),
            is_public: false,
            content: Some(content),
        }
    }

    /// Sets the initial visibility.
    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}

/// The durable part of a file record.
///
/// Serialized field names follow the persisted layout:
/// `id`, `name`, `size`, `type`, `uploadedAt`, `isPublic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistableFileRecord {
    /// Unique identifier.
    pub id: FileId,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type; may be empty.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Creation time.
    #[serde(rename = "uploadedAt", with = "iso8601_millis")]
    pub uploaded_at: DateTime<Utc>,
    /// Visibility flag.
    #[serde(rename = "isPublic")]
    pub is_public: bool,
}

/// A file record as held in memory by the store.
///
/// There is deliberately no `Serialize` impl; persist through
/// [`RuntimeFileRecord::to_persistable`].
#[derive(Debug, Clone)]
pub struct RuntimeFileRecord {
    meta: PersistableFileRecord,
    content: Option<ContentHandle>,
    preview_url: Option<PreviewUrl>,
}

impl RuntimeFileRecord {
    /// Creates a record with a fresh id and the current time.
    ///
    /// `preview_url` is the reference minted for `upload.content`, if any.
    pub fn create(upload: NewFile, preview_url: Option<PreviewUrl>) -> Self {
        Self {
            meta: PersistableFileRecord {
                id: FileId::generate(),
                name: upload.name,
                size: upload.size,
                mime_type: upload.mime_type,
                // Millisecond precision survives the snapshot unchanged.
                uploaded_at: Utc::now().trunc_subsecs(3),
                is_public: upload.is_public,
            },
            content: upload.content,
            preview_url,
        }
    }

    /// Rebuilds a metadata-only record from durable storage.
    pub fn restored(meta: PersistableFileRecord) -> Self {
        Self {
            meta,
            content: None,
            preview_url: None,
        }
    }

    /// Projects the record onto its durable fields.
    pub fn to_persistable(&self) -> PersistableFileRecord {
        self.meta.clone()
    }

    /// Borrows the durable fields.
    pub fn metadata(&self) -> &PersistableFileRecord {
        &self.meta
    }

    pub fn id(&self) -> &FileId {
        &self.meta.id
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn size(&self) -> i64 {
        self.meta.size
    }

    pub fn mime_type(&self) -> &str {
        &self.meta.mime_type
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.meta.uploaded_at
    }

    pub fn is_public(&self) -> bool {
        self.meta.is_public
    }

    /// The uploaded bytes, present only in the process that uploaded them.
    pub fn content(&self) -> Option<&ContentHandle> {
        self.content.as_ref()
    }

    pub fn preview_url(&self) -> Option<&PreviewUrl> {
        self.preview_url.as_ref()
    }

    /// Flips visibility and returns the new value.
    pub fn toggle_public(&mut self) -> bool {
        self.meta.is_public = !self.meta.is_public;
        self.meta.is_public
    }

    /// Detaches the preview reference so the caller can release it.
    pub fn take_preview_url(&mut self) -> Option<PreviewUrl> {
        self.preview_url.take()
    }
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: String = Deserialize::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|time| time.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_file() -> NewFile {
        NewFile::metadata_only("a.txt", 10, "text/plain")
    }

    #[test]
    fn test_new_file_from_content() {
        let content = ContentHandle::new("photo.png", vec![1u8; 42]);
        let upload = NewFile::from_content(content, "image/png");

        assert_eq!(upload.name, "photo.png");
        assert_eq!(upload.size, 42);
        assert_eq!(upload.mime_type, "image/png");
        assert!(!upload.is_public);
        assert!(upload.content.is_some());
    }

    #[test]
    fn test_create_defaults_private() {
        let record = RuntimeFileRecord::create(text_file(), None);
        assert!(!record.is_public());
        assert_eq!(record.name(), "a.txt");
        assert_eq!(record.size(), 10);
        assert!(record.content().is_none());
        assert!(record.preview_url().is_none());
    }

    #[test]
    fn test_create_keeps_requested_visibility() {
        let record = RuntimeFileRecord::create(text_file().public(true), None);
        assert!(record.is_public());
    }

    #[test]
    fn test_create_accepts_odd_input() {
        let record = RuntimeFileRecord::create(NewFile::metadata_only("", -5, ""), None);
        assert_eq!(record.name(), "");
        assert_eq!(record.size(), -5);
        assert_eq!(record.mime_type(), "");
    }

    #[test]
    fn test_toggle_public_is_involution() {
        let mut record = RuntimeFileRecord::create(text_file(), None);
        assert!(record.toggle_public());
        assert!(!record.toggle_public());
        assert!(!record.is_public());
    }

    #[test]
    fn test_persistable_field_names() {
        let record = RuntimeFileRecord::create(text_file(), None);
        let value = serde_json::to_value(record.to_persistable()).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["id", "isPublic", "name", "size", "type", "uploadedAt"]
        );
    }

    #[test]
    fn test_projection_excludes_ephemeral_fields() {
        let content = ContentHandle::new("a.txt", b"0123456789".to_vec());
        let record = RuntimeFileRecord::create(
            NewFile::from_content(content, "text/plain"),
            Some(PreviewUrl::mint()),
        );

        let json = serde_json::to_string(&record.to_persistable()).unwrap();
        assert!(!json.contains("blob:"));
        assert!(!json.contains("content"));
        assert!(!json.contains("url"));
    }

    #[test]
    fn test_uploaded_at_uses_millisecond_iso8601() {
        let record = RuntimeFileRecord::create(text_file(), None);
        let value = serde_json::to_value(record.to_persistable()).unwrap();
        let stamp = value["uploadedAt"].as_str().unwrap();

        // 2024-01-01T00:00:00.000Z
        assert_eq!(stamp.len(), 24);
        assert!(stamp.ends_with('Z'));
    }

    #[test]
    fn test_persistable_roundtrip_is_exact() {
        let record = RuntimeFileRecord::create(text_file(), None);
        let json = serde_json::to_string(&record.to_persistable()).unwrap();
        let restored: PersistableFileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record.to_persistable());
    }

    #[test]
    fn test_parses_browser_snapshot_entry() {
        let json = r#"{
            "id": "x7f3k2",
            "name": "notes.txt",
            "size": 2048,
            "type": "text/plain",
            "uploadedAt": "2024-05-01T12:30:00.000Z",
            "isPublic": true
        }"#;
        let meta: PersistableFileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(meta.id.as_str(), "x7f3k2");
        assert_eq!(meta.size, 2048);
        assert!(meta.is_public);

        let record = RuntimeFileRecord::restored(meta);
        assert!(record.content().is_none());
        assert!(record.preview_url().is_none());
    }

    #[test]
    fn test_take_preview_url() {
        let mut record = RuntimeFileRecord::create(text_file(), Some(PreviewUrl::mint()));
        assert!(record.take_preview_url().is_some());
        assert!(record.take_preview_url().is_none());
    }
}
