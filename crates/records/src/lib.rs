//! # CloudStore Records Library
//!
//! This crate defines the data model shared by every part of CloudStore:
//! the file record itself, its identifier, the ephemeral content and
//! preview references, and the layout of the persisted snapshot.
//!
//! ## Overview
//!
//! A file record lives in two shapes:
//!
//! - **[`PersistableFileRecord`]**: the durable fields only. This is the
//!   only shape that is ever serialized.
//! - **[`RuntimeFileRecord`]**: the durable fields plus the in-memory
//!   [`ContentHandle`] and [`PreviewUrl`]. It cannot be serialized; use
//!   [`RuntimeFileRecord::to_persistable`] to project it.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │       RuntimeFileRecord       │  content + preview (process lifetime)
//! │ ┌───────────────────────────┐ │
//! │ │   PersistableFileRecord   │ │  id, name, size, type,
//! │ └───────────────────────────┘ │  uploadedAt, isPublic
//! └───────────────────────────────┘
//!                 │ to_persistable()
//!                 ▼
//!        Snapshot { files: [...] }  JSON in durable storage
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use records::{ContentHandle, NewFile, RuntimeFileRecord, Snapshot};
//!
//! let content = ContentHandle::new("a.txt", b"hello".to_vec());
//! let upload = NewFile::from_content(content, "text/plain");
//! let record = RuntimeFileRecord::create(upload, None);
//! assert!(!record.is_public());
//!
//! let snapshot = Snapshot::new(vec![record.to_persistable()]);
//! let json = snapshot.to_json().unwrap();
//! assert!(!json.contains("content"));
//! ```
//!
//! ## Modules
//!
//! - [`id`]: File identifiers
//! - [`record`]: Persistable and runtime record shapes
//! - [`content`]: Content handles and preview references
//! - [`snapshot`]: Persisted snapshot layout
//! - [`error`]: Error types

pub mod content;
pub mod error;
pub mod id;
pub mod record;
pub mod snapshot;

pub use content::{ContentHandle, PreviewUrl, PREVIEW_URL_PREFIX};
pub use error::{RecordError, Result};
pub use id::FileId;
pub use record::{NewFile, PersistableFileRecord, RuntimeFileRecord};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
