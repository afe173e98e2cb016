//! # CloudStore Library
//!
//! This crate provides a single-user file collection whose metadata
//! survives restarts while the uploaded bytes do not.
//!
//! ## Overview
//!
//! - **File Store**: add, remove, toggle visibility and look up records;
//!   a metadata snapshot is written after every change
//! - **Uploads**: collect files, then commit them after a simulated delay
//! - **Previews**: transient references to content uploaded in this process
//! - **Sharing**: public/private access check for shared links
//! - **Login Gate**: demo sign-in that accepts any credentials
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      CLI (main.rs)                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────┐  │
//! │  │    Upload    │  │    Stats /   │  │  Login Gate   │  │
//! │  │  Collector   │  │    Share     │  │               │  │
//! │  └──────┬───────┘  └──────┬───────┘  └───────┬───────┘  │
//! │         ▼                 ▼                  │          │
//! │  ┌──────────────────────────────────┐        │          │
//! │  │  FileStore  +  PreviewRegistry   │        │          │
//! │  └────────────────┬─────────────────┘        │          │
//! │                   ▼                          ▼          │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │       DurableStorage (JSON files / memory)         │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use cloudstore::files::FileStore;
//! use cloudstore::storage::MemoryStorage;
//! use cloudstore::records::NewFile;
//!
//! let mut store = FileStore::with_default_key(MemoryStorage::new());
//! let id = store.add(NewFile::metadata_only("a.txt", 10, "text/plain"));
//!
//! assert_eq!(store.toggle_public(&id), Some(true));
//! assert!(store.get(&id).unwrap().is_public());
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and defaults
//! - [`storage`]: Durable key/value storage backends
//! - [`files`]: Record store, previews, uploads, stats and sharing
//! - [`auth`]: Demo login gate
//! - [`ui`]: Formatting and MIME classification

pub mod auth;
pub mod config;
pub mod files;
pub mod storage;
pub mod ui;

// Re-export records for convenience
pub use records;

pub use auth::{AuthError, AuthGate, User};
pub use config::Config;
pub use files::{
    resolve_shared, FileStore, ShareError, StorageStats, StoreError, UploadCollector,
    UploadError, UploadReport,
};
pub use storage::{DurableStorage, JsonFileStorage, MemoryStorage, StorageError};
