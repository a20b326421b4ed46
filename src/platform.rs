//! Host collaborators: clipboard and file delivery
//!
//! The session never touches the OS directly. A host passes in whatever
//! clipboard and download target it has; tests use the in-memory ones.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} unavailable")]
    Unavailable(String),
}

/// Text clipboard
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), PlatformError>;
}

/// Destination for exported files
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Store `bytes` under `file_name`, returning where they ended up
    async fn deliver(&self, file_name: &str, mime_type: &str, bytes: &[u8])
        -> Result<String, PlatformError>;
}

/// Clipboard that keeps the last written text in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), PlatformError> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard for hosts without one
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable("clipboard".to_string()))
    }
}

/// Writes exports into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn deliver(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<String, PlatformError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), mime_type, size = bytes.len(), "Export written");
        Ok(path.display().to_string())
    }
}

/// A file handed to a [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Sink that keeps every delivered file in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<DeliveredFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<DeliveredFile> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl FileSink for MemorySink {
    async fn deliver(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<String, PlatformError> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DeliveredFile {
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
                bytes: bytes.to_vec(),
            });
        Ok(format!("memory:{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_clipboard_keeps_last_write() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);
        clipboard.write_text("first").unwrap();
        clipboard.write_text("second").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("second"));
    }

    #[test]
    fn test_no_clipboard_reports_unavailable() {
        assert!(matches!(
            NoClipboard.write_text("x"),
            Err(PlatformError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_sink_creates_dir_and_writes() {
        let tmp = TempDir::new().unwrap();
        let sink = DirectorySink::new(tmp.path().join("nested").join("exports"));

        let location = sink
            .deliver("chat.json", "application/json", b"{}")
            .await
            .unwrap();

        let written = std::fs::read(sink.dir().join("chat.json")).unwrap();
        assert_eq!(written, b"{}");
        assert!(location.ends_with("chat.json"));
    }

    #[tokio::test]
    async fn test_directory_sink_overwrites() {
        let tmp = TempDir::new().unwrap();
        let sink = DirectorySink::new(tmp.path());
        sink.deliver("a.pdf", "application/pdf", b"one").await.unwrap();
        sink.deliver("a.pdf", "application/pdf", b"two").await.unwrap();
        assert_eq!(std::fs::read(tmp.path().join("a.pdf")).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_memory_sink_records_files() {
        let sink = MemorySink::new();
        let location = sink.deliver("x.json", "application/json", b"1").await.unwrap();
        assert_eq!(location, "memory:x.json");
        assert_eq!(
            sink.files(),
            vec![DeliveredFile {
                file_name: "x.json".to_string(),
                mime_type: "application/json".to_string(),
                bytes: b"1".to_vec(),
            }]
        );
    }
}
