//! File collection module.
//!
//! This module provides the single-user file collection:
//! - The record store with durable metadata snapshots
//! - Preview references for content uploaded in this process
//! - Upload collection with a simulated commit delay
//! - Aggregate statistics and the shared-link access check

pub mod previews;
pub mod share;
pub mod stats;
pub mod store;
pub mod upload;

pub use previews::PreviewRegistry;
pub use share::{resolve_shared, ShareError};
pub use stats::StorageStats;
pub use store::{FileStore, StoreError};
pub use upload::{guess_mime_type, Draft, UploadCollector, UploadError, UploadReport};
