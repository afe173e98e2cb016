//! Upload collection and commit.
//!
//! The collector accumulates selected files as drafts. Nothing reaches the
//! store until [`UploadCollector::commit`], which waits a simulated network
//! latency and then adds every draft as a private record.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use records::{ContentHandle, FileId, NewFile};
use thiserror::Error;

use super::store::FileStore;
use crate::config::DEFAULT_COMMIT_DELAY_MS;
use crate::storage::DurableStorage;

/// Errors raised while collecting drafts.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The selected file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No draft at the given position.
    #[error("no selected file at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A selected file that has not been committed yet.
#[derive(Debug, Clone)]
pub struct Draft {
    pub content: ContentHandle,
    pub mime_type: String,
}

impl Draft {
    pub fn name(&self) -> &str {
        self.content.name()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Outcome of a commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
    /// Ids of the new records, in selection order.
    pub ids: Vec<FileId>,
}

impl UploadReport {
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// One-line notification text.
    pub fn summary(&self) -> String {
        format!("{} file(s) uploaded successfully", self.count())
    }
}

/// Client-side selection of files awaiting upload.
#[derive(Debug)]
pub struct UploadCollector {
    drafts: Vec<Draft>,
    commit_delay: Duration,
}

impl Default for UploadCollector {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_COMMIT_DELAY_MS))
    }
}

impl UploadCollector {
    /// Creates an empty collector with the given simulated latency.
    pub fn new(commit_delay: Duration) -> Self {
        Self {
            drafts: Vec::new(),
            commit_delay,
        }
    }

    /// Adds an in-memory file to the selection.
    pub fn select(&mut self, content: ContentHandle, mime_type: impl Into<String>) {
        let draft = Draft {
            content,
            mime_type: mime_type.into(),
        };
        tracing::debug!("Selected {:?} ({} bytes)", draft.name(), draft.len());
        self.drafts.push(draft);
    }

    /// Reads a file from disk and adds it to the selection.
    ///
    /// The MIME type is guessed from the extension. On failure the
    /// selection is left unchanged.
    pub fn select_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), UploadError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = guess_mime_type(&name);

        self.select(ContentHandle::new(name, data), mime_type);
        Ok(())
    }

    /// Drops a draft from the selection.
    pub fn remove_at(&mut self, index: usize) -> Result<Draft, UploadError> {
        if index >= self.drafts.len() {
            return Err(UploadError::IndexOutOfRange {
                index,
                len: self.drafts.len(),
            });
        }
        Ok(self.drafts.remove(index))
    }

    /// Drops every draft.
    pub fn clear(&mut self) {
        self.drafts.clear();
    }

    pub fn drafts(&self) -> &[Draft] {
        &self.drafts
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Commits every draft to the store as a private record.
    ///
    /// Waits the simulated latency first. An empty selection returns at
    /// once with an empty report.
    pub async fn commit<S: DurableStorage>(&mut self, store: &mut FileStore<S>) -> UploadReport {
        if self.drafts.is_empty() {
            return UploadReport::default();
        }

        tracing::info!(
            "Uploading {} file(s) after {:?}",
            self.drafts.len(),
            self.commit_delay
        );
        tokio::time::sleep(self.commit_delay).await;

        let ids = self
            .drafts
            .drain(..)
            .map(|draft| store.add(NewFile::from_content(draft.content, draft.mime_type)))
            .collect();

        UploadReport { ids }
    }
}

/// Guesses a MIME type from a file name's extension.
///
/// Unknown extensions yield an empty string, as a browser reports them.
pub fn guess_mime_type(filename: &str) -> String {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return String::new(),
    };

    match ext.as_str() {
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",
        _ => "",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use tempfile::TempDir;

    fn collector() -> UploadCollector {
        UploadCollector::new(Duration::ZERO)
    }

    fn handle(name: &str) -> ContentHandle {
        ContentHandle::new(name, name.as_bytes().to_vec())
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("a.txt"), "text/plain");
        assert_eq!(guess_mime_type("PHOTO.JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("archive.tar.gz"), "application/gzip");
        assert_eq!(guess_mime_type("Makefile"), "");
        assert_eq!(guess_mime_type("data.unknownext"), "");
    }

    #[test]
    fn test_select_accumulates() {
        let mut collector = collector();
        collector.select(handle("a.txt"), "text/plain");
        collector.select(handle("b.png"), "image/png");

        let names: Vec<&str> = collector.drafts().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["a.txt", "b.png"]);
    }

    #[test]
    fn test_select_path_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.md");
        fs::write(&path, "# hi").unwrap();

        let mut collector = collector();
        collector.select_path(&path).unwrap();

        let draft = &collector.drafts()[0];
        assert_eq!(draft.name(), "notes.md");
        assert_eq!(draft.mime_type, "text/markdown");
        assert_eq!(draft.len(), 4);
    }

    #[test]
    fn test_select_path_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut collector = collector();

        let err = collector
            .select_path(temp_dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_remove_at() {
        let mut collector = collector();
        collector.select(handle("a"), "");
        collector.select(handle("b"), "");
        collector.select(handle("c"), "");

        let removed = collector.remove_at(1).unwrap();
        assert_eq!(removed.name(), "b");

        let names: Vec<&str> = collector.drafts().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut collector = collector();
        collector.select(handle("a"), "");

        let err = collector.remove_at(3).unwrap_err();
        assert!(matches!(err, UploadError::IndexOutOfRange { index: 3, len: 1 }));
        assert_eq!(collector.drafts().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_adds_private_records() {
        let mut store = FileStore::with_default_key(MemoryStorage::new());
        let mut collector = collector();
        collector.select(handle("a.txt"), "text/plain");
        collector.select(handle("b.png"), "image/png");

        let report = collector.commit(&mut store).await;

        assert_eq!(report.count(), 2);
        assert_eq!(report.summary(), "2 file(s) uploaded successfully");
        assert!(collector.is_empty());
        assert_eq!(store.len(), 2);

        for id in &report.ids {
            let record = store.get(id).unwrap();
            assert!(!record.is_public());
            assert!(record.content().is_some());
            assert!(record.preview_url().is_some());
        }
        assert_eq!(store.list()[0].name(), "a.txt");
        assert_eq!(store.list()[1].mime_type(), "image/png");
    }

    #[tokio::test]
    async fn test_commit_empty_selection() {
        let mut store = FileStore::with_default_key(MemoryStorage::new());
        let mut collector = collector();

        let report = collector.commit(&mut store).await;
        assert_eq!(report.count(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_waits_for_delay() {
        let mut store = FileStore::with_default_key(MemoryStorage::new());
        let mut collector = UploadCollector::default();
        collector.select(handle("a.txt"), "text/plain");

        let started = tokio::time::Instant::now();
        collector.commit(&mut store).await;

        assert!(started.elapsed() >= Duration::from_millis(DEFAULT_COMMIT_DELAY_MS));
        assert_eq!(store.len(), 1);
    }
}
