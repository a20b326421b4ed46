//! Identifier generation for chats and messages
//!
//! Ids combine a per-generator tag with a monotonic counter, so they never
//! repeat within a session and never collide with the seed ids.

use crate::types::{ChatId, MessageId};
use std::sync::atomic::{AtomicU64, Ordering};

const TAG_LEN: usize = 8;

/// Source of unique ids, shared by everything in one session
#[derive(Debug)]
pub struct IdGenerator {
    tag: String,
    next: AtomicU64,
}

impl IdGenerator {
    /// Generator with a random tag
    pub fn new() -> Self {
        let tag: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(TAG_LEN)
            .collect();
        Self::with_tag(tag)
    }

    /// Generator with a fixed tag, for deterministic ids
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            next: AtomicU64::new(1),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn chat_id(&self) -> ChatId {
        ChatId::new(self.next_raw("chat"))
    }

    pub fn message_id(&self) -> MessageId {
        MessageId::new(self.next_raw("msg"))
    }

    fn next_raw(&self, prefix: &str) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{}-{n}", self.tag)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
