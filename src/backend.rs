//! Completion backend abstraction
//!
//! Stands in for a remote inference API. The session only talks to
//! [`CompletionBackend`]; the shipped implementation is [`SimulatedBackend`].

mod latency;
mod simulated;

#[cfg(test)]
pub mod testing;

pub use latency::{FixedLatency, Latency, NoLatency, Phase, GENERATION_DELAY, TYPING_DELAY};
pub use simulated::{SimulatedBackend, CANNED_OPENINGS, SIMULATION_DISCLAIMER};

use crate::types::{Chat, ChatId, ChatParameters, Message};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Everything a completion needs
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub content: String,
    /// Display name of the selected model
    pub model: String,
    pub chat_id: ChatId,
    pub parameters: ChatParameters,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("simulated failure while answering chat {chat_id}")]
    Simulated { chat_id: ChatId },
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Produce the assistant's reply to `request`
    async fn request_completion(&self, request: &CompletionRequest) -> Result<Message, BackendError>;

    /// Create a new empty chat, titled `title` or a date-derived default
    async fn create_chat(&self, title: Option<&str>) -> Result<Chat, BackendError>;
}

#[async_trait]
impl<T: CompletionBackend + ?Sized> CompletionBackend for Arc<T> {
    async fn request_completion(&self, request: &CompletionRequest) -> Result<Message, BackendError> {
        (**self).request_completion(request).await
    }

    async fn create_chat(&self, title: Option<&str>) -> Result<Chat, BackendError> {
        (**self).create_chat(title).await
    }
}

/// Logging wrapper for completion backends
pub struct LoggingBackend {
    inner: Arc<dyn CompletionBackend>,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn CompletionBackend>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CompletionBackend for LoggingBackend {
    async fn request_completion(&self, request: &CompletionRequest) -> Result<Message, BackendError> {
        let start = Instant::now();
        let result = self.inner.request_completion(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(message) => {
                tracing::info!(
                    chat_id = %request.chat_id,
                    model = %request.model,
                    duration_ms = %duration.as_millis(),
                    reply_len = message.content.len(),
                    "Completion finished"
                );
            }
            Err(e) => {
                tracing::error!(
                    chat_id = %request.chat_id,
                    model = %request.model,
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "Completion failed"
                );
            }
        }

        result
    }

    async fn create_chat(&self, title: Option<&str>) -> Result<Chat, BackendError> {
        let result = self.inner.create_chat(title).await;
        match &result {
            Ok(chat) => tracing::info!(chat_id = %chat.id, title = %chat.title, "Chat created"),
            Err(e) => tracing::error!(error = %e, "Chat creation failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use crate::catalog::DEFAULT_PARAMETERS;
    use crate::types::{MessageId, Role};
    use chrono::Utc;

    fn request() -> CompletionRequest {
        CompletionRequest {
            content: "hello".to_string(),
            model: "GPT-4".to_string(),
            chat_id: ChatId::from("chat-1"),
            parameters: DEFAULT_PARAMETERS,
        }
    }

    #[tokio::test]
    async fn test_logging_backend_passes_results_through() {
        let scripted = Arc::new(ScriptedBackend::new());
        scripted.queue_reply(Message::assistant(
            MessageId::from("r1"),
            "scripted",
            Some("GPT-4".to_string()),
            Utc::now(),
        ));
        scripted.queue_error(BackendError::Unavailable("down".to_string()));

        let logging = LoggingBackend::new(scripted.clone());

        let reply = logging.request_completion(&request()).await.unwrap();
        assert_eq!(reply.content, "scripted");
        assert_eq!(reply.role, Role::Assistant);

        let err = logging.request_completion(&request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(_)));

        assert_eq!(scripted.recorded_requests(), vec![request(), request()]);
    }
}
