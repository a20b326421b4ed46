//! Chat export
//!
//! Two encoders: a JSON envelope and a paginated PDF transcript. Both are
//! deterministic for a given chat and export timestamp.

mod document;
mod json;
mod pdf;

pub use document::{layout, wrap, Document, Page, TextLine, WRAP_COLUMNS};
pub use json::{ExportEnvelope, EXPORT_VERSION};

use crate::platform::PlatformError;
use crate::types::Chat;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no chat is selected")]
    NoActiveChat,
    #[error("an export is already in progress")]
    Busy,
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported export version {0:?}")]
    UnsupportedVersion(String),
    #[error("delivering export failed: {0}")]
    Delivery(#[from] PlatformError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// Download name: every non-alphanumeric character becomes `_`, lower-cased
pub fn file_name(title: &str, format: ExportFormat) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.{}", format.extension())
}

/// Encode `chat` in `format`
pub fn encode(
    chat: &Chat,
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Json => {
            let envelope = ExportEnvelope::new(chat.clone(), exported_at);
            Ok(envelope.to_json()?.into_bytes())
        }
        ExportFormat::Pdf => Ok(pdf::render(&layout(chat), &chat.title, exported_at)),
    }
}
