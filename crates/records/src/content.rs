//! Ephemeral content handles and preview references.
//!
//! Neither type here is ever written to durable storage. They exist only
//! for the lifetime of the process that performed the upload.

use std::fmt;

use bytes::Bytes;
use uuid::Uuid;

/// Scheme prefix of every preview reference.
pub const PREVIEW_URL_PREFIX: &str = "blob:cloudstore/";

/// In-memory reference to the bytes of an uploaded file.
///
/// Cloning is cheap; all clones share the same buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentHandle {
    name: String,
    data: Bytes,
}

impl ContentHandle {
    /// Creates a handle over the given bytes.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// The original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file contents.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Number of bytes held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the handle holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentHandle")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Transient reference into the preview table, e.g.
/// `blob:cloudstore/0f8fad5b-d9cb-469f-a165-70867728950e`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    /// Mints a new, never before seen reference.
    pub fn mint() -> Self {
        Self(format!("{}{}", PREVIEW_URL_PREFIX, Uuid::new_v4()))
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
