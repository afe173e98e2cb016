//! MIME classification for icons and previews.

use records::RuntimeFileRecord;
use serde::Serialize;

/// Broad file category used to pick a list icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    /// Plain text and PDF documents.
    Text,
    Archive,
    Other,
}

impl FileKind {
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            FileKind::Image
        } else if mime_type.starts_with("video/") {
            FileKind::Video
        } else if mime_type.starts_with("audio/") {
            FileKind::Audio
        } else if mime_type.starts_with("text/") || mime_type.contains("pdf") {
            FileKind::Text
        } else if mime_type.contains("zip") || mime_type.contains("rar") {
            FileKind::Archive
        } else {
            FileKind::Other
        }
    }

    /// Short label for terminal listings.
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
            FileKind::Text => "text",
            FileKind::Archive => "archive",
            FileKind::Other => "file",
        }
    }
}

/// What a preview dialog can render for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// No bytes in this process, e.g. after a reload.
    Unavailable,
    Image,
    Video,
    Audio,
    /// Text files are offered for download rather than rendered inline.
    Text,
    /// Anything else: download only.
    Download,
}

impl PreviewMode {
    pub fn for_record(record: &RuntimeFileRecord) -> Self {
        if record.preview_url().is_none() {
            return PreviewMode::Unavailable;
        }

        let mime_type = record.mime_type();
        if mime_type.starts_with("image/") {
            PreviewMode::Image
        } else if mime_type.starts_with("video/") {
            PreviewMode::Video
        } else if mime_type.starts_with("audio/") {
            PreviewMode::Audio
        } else if mime_type.starts_with("text/") {
            PreviewMode::Text
        } else {
            PreviewMode::Download
        }
    }

    /// Whether the record's bytes can be downloaded.
    pub fn can_download(self) -> bool {
        self != PreviewMode::Unavailable
    }
}
