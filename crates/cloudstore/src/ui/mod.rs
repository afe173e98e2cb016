//! Presentation helpers.
//!
//! Pure functions used by the CLI to render records: size and relative
//! time formatting, MIME classification and preview availability.

pub mod format;
pub mod kind;

pub use format::{format_kib, format_relative, format_size};
pub use kind::{FileKind, PreviewMode};
