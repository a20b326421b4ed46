//! JSON export envelope

use super::ExportError;
use crate::types::Chat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EXPORT_VERSION: &str = "1.0";

/// A chat plus export metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub chat: Chat,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

impl ExportEnvelope {
    pub fn new(chat: Chat, exported_at: DateTime<Utc>) -> Self {
        Self {
            chat,
            exported_at,
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Pretty-printed with two-space indentation
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ExportError> {
        let envelope: Self = serde_json::from_str(raw)?;
        if envelope.version != EXPORT_VERSION {
            return Err(ExportError::UnsupportedVersion(envelope.version));
        }
        Ok(envelope)
    }
}
