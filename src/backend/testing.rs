//! Mock backends for testing
//!
//! These mocks let session tests script replies and failures without timers.

use super::{BackendError, CompletionBackend, CompletionRequest};
use crate::types::{Chat, ChatId, Message};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Backend that returns queued replies in order
#[allow(dead_code)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<Message, BackendError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<CompletionRequest>>,
    delay: Duration,
    chats_created: AtomicU32,
    fail_create: bool,
    /// Notified when a completion request starts
    pub request_started: Arc<Notify>,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            chats_created: AtomicU32::new(0),
            fail_create: false,
            request_started: Arc::new(Notify::new()),
        }
    }

    /// Wait this long before answering each request
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make `create_chat` fail
    #[must_use]
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, message: Message) {
        self.replies.lock().unwrap().push_back(Ok(message));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: BackendError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn request_completion(&self, request: &CompletionRequest) -> Result<Message, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.request_started.notify_waiters();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Unavailable("No scripted reply queued".to_string())))
    }

    async fn create_chat(&self, title: Option<&str>) -> Result<Chat, BackendError> {
        if self.fail_create {
            return Err(BackendError::Unavailable("create disabled".to_string()));
        }
        let n = self.chats_created.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(Chat::new(
            ChatId::new(format!("scripted-chat-{n}")),
            title.unwrap_or("Scripted chat"),
            Utc::now(),
        ))
    }
}
