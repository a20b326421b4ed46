//! Session controller
//!
//! Sequences store actions around backend calls the way an input box would:
//! user message, loading on, await the reply, reply (or an apology), loading
//! off. A [`Session`] is cheap to clone; clones drive the same store.

use crate::backend::{
    BackendError, CompletionBackend, CompletionRequest, FixedLatency, LoggingBackend,
    SimulatedBackend,
};
use crate::catalog::{self, Preset, DEFAULT_PARAMETERS};
use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::export::{self, ExportError, ExportFormat};
use crate::ids::IdGenerator;
use crate::platform::{Clipboard, FileSink, NoClipboard, PlatformError};
use crate::store::{Action, Outcome, Store, StoreState};
use crate::types::{Chat, ChatId, Message, MessageId, ParameterUpdate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Assistant text shown when a completion fails
pub const FAILURE_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("unknown model {0:?}")]
    UnknownModel(String),
    #[error("unknown template {0:?}")]
    UnknownTemplate(String),
    #[error("message {0} is not in the active chat")]
    UnknownMessage(MessageId),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("completion task failed: {0}")]
    Completion(#[from] tokio::task::JoinError),
}

/// Where an export went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub file_name: String,
    pub location: String,
    pub size: usize,
}

struct SessionInner {
    store: Store,
    backend: Arc<dyn CompletionBackend>,
    ids: Arc<IdGenerator>,
    clock: Arc<dyn Clock>,
    clipboard: Arc<dyn Clipboard>,
    exporting: AtomicBool,
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

/// Assembles a [`Session`] from its collaborators
pub struct SessionBuilder {
    state: StoreState,
    backend: Option<Arc<dyn CompletionBackend>>,
    ids: Arc<IdGenerator>,
    clock: Arc<dyn Clock>,
    clipboard: Arc<dyn Clipboard>,
}

impl SessionBuilder {
    #[must_use]
    pub fn state(mut self, state: StoreState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn CompletionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn ids(mut self, ids: Arc<IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Without an explicit backend, a simulated one sharing this builder's
    /// ids and clock is used
    pub fn build(self) -> Session {
        let backend = self.backend.unwrap_or_else(|| {
            Arc::new(
                SimulatedBackend::new(self.ids.clone()).with_clock(self.clock.clone()),
            )
        });
        Session {
            inner: Arc::new(SessionInner {
                store: Store::new(self.state, self.clock.clone()),
                backend,
                ids: self.ids,
                clock: self.clock,
                clipboard: self.clipboard,
                exporting: AtomicBool::new(false),
            }),
        }
    }
}

/// Clears the exporting flag however the export ends
struct ExportGuard<'a>(&'a AtomicBool);

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder {
            state: StoreState::seeded(),
            backend: None,
            ids: Arc::new(IdGenerator::new()),
            clock: Arc::new(SystemClock),
            clipboard: Arc::new(NoClipboard),
        }
    }

    /// Seeded session over a logged simulated backend tuned by `config`
    pub fn from_config(config: &SessionConfig, clipboard: Arc<dyn Clipboard>) -> Self {
        let ids = Arc::new(IdGenerator::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let mut simulated = SimulatedBackend::new(ids.clone())
            .with_latency(Arc::new(FixedLatency::new(
                config.typing_delay,
                config.generation_delay,
            )))
            .with_clock(clock.clone())
            .with_failure_rate(config.failure_rate);
        if let Some(seed) = config.seed {
            simulated = simulated.with_seed(seed);
        }

        tracing::info!(
            session_tag = ids.tag(),
            model = config.default_model.id,
            preset = config.preset.map(Preset::name),
            failure_rate = config.failure_rate,
            "Session starting"
        );

        Self::builder()
            .state(StoreState::new(
                catalog::seed_chats(),
                config.default_model,
                config.preset.map_or(DEFAULT_PARAMETERS, Preset::parameters),
            ))
            .backend(Arc::new(LoggingBackend::new(Arc::new(simulated))))
            .ids(ids)
            .clock(clock)
            .clipboard(clipboard)
            .build()
    }

    pub fn snapshot(&self) -> StoreState {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.store.subscribe()
    }

    pub fn is_exporting(&self) -> bool {
        self.inner.exporting.load(Ordering::Acquire)
    }

    fn dispatch(&self, action: Action) -> Outcome {
        self.inner.store.dispatch(action)
    }

    // ========================================================================
    // Messaging
    // ========================================================================

    /// Send `text` to the active chat (creating one if none is selected)
    /// and wait for the reply.
    ///
    /// Backend failures are turned into an assistant apology in the chat.
    /// Once the user message is recorded the completion finishes even if
    /// this future is dropped.
    pub async fn send_message(&self, text: &str) -> Result<Message, SessionError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let active = self.inner.store.read(|s| s.active_chat_id().cloned());
        let chat_id = if let Some(id) = active {
            id
        } else {
            let chat = self.inner.backend.create_chat(None).await?;
            let id = chat.id.clone();
            self.dispatch(Action::CreateChat(chat));
            id
        };

        let user = Message::user(self.inner.ids.message_id(), content, self.inner.clock.now());
        self.dispatch(Action::AddMessage {
            chat_id: chat_id.clone(),
            message: user,
        });
        self.dispatch(Action::SetLoading(true));

        let request = self.inner.store.read(|s| CompletionRequest {
            content: content.to_string(),
            model: s.selected_model().name.to_string(),
            chat_id: chat_id.clone(),
            parameters: *s.parameters(),
        });

        // The rest runs detached so a caller that stops waiting cannot leave
        // the chat without a reply or the loading flag stuck on
        let session = self.clone();
        let pending = tokio::spawn(async move { session.complete(chat_id, request).await });
        Ok(pending.await?)
    }

    /// Await the backend, record the reply (or the apology) and clear the
    /// loading flag
    async fn complete(&self, chat_id: ChatId, request: CompletionRequest) -> Message {
        let reply = match self.inner.backend.request_completion(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(chat_id = %chat_id, error = %e, "Replying with failure notice");
                Message::assistant(
                    self.inner.ids.message_id(),
                    FAILURE_REPLY,
                    None,
                    self.inner.clock.now(),
                )
            }
        };

        let outcome = self.dispatch(Action::AddMessage {
            chat_id: chat_id.clone(),
            message: reply.clone(),
        });
        if outcome.is_ignored() {
            tracing::warn!(chat_id = %chat_id, outcome = ?outcome, "Reply dropped");
        }
        self.dispatch(Action::SetLoading(false));

        reply
    }

    // ========================================================================
    // Chats
    // ========================================================================

    /// Create an empty chat and make it active
    pub async fn new_chat(&self, title: Option<&str>) -> Result<Chat, SessionError> {
        let chat = self.inner.backend.create_chat(title).await?;
        self.dispatch(Action::CreateChat(chat.clone()));
        Ok(chat)
    }

    pub fn delete_chat(&self, id: &ChatId) -> Outcome {
        self.dispatch(Action::DeleteChat(id.clone()))
    }

    /// Select a chat; `None` clears the selection
    pub fn select_chat(&self, id: Option<&ChatId>) -> Outcome {
        self.dispatch(Action::SetActiveChat(id.cloned()))
    }

    // ========================================================================
    // Model and parameters
    // ========================================================================

    pub fn select_model(&self, model_id: &str) -> Result<(), SessionError> {
        let model = catalog::find_model(model_id)
            .ok_or_else(|| SessionError::UnknownModel(model_id.to_string()))?;
        self.dispatch(Action::SetModel(model));
        Ok(())
    }

    pub fn update_parameters(&self, update: ParameterUpdate) -> Outcome {
        self.dispatch(Action::UpdateParameters(update))
    }

    pub fn apply_preset(&self, preset: Preset) -> Outcome {
        self.update_parameters(preset.parameters().into())
    }

    pub fn reset_parameters(&self) -> Outcome {
        self.update_parameters(DEFAULT_PARAMETERS.into())
    }

    // ========================================================================
    // Layout
    // ========================================================================

    pub fn toggle_sidebar(&self) {
        self.dispatch(Action::ToggleSidebar);
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.dispatch(Action::SetSidebarOpen(open));
    }

    // ========================================================================
    // Templates, clipboard, export
    // ========================================================================

    /// Text for the input box after picking a template
    pub fn compose_with_template(&self, template_id: &str, draft: &str) -> Result<String, SessionError> {
        let template = catalog::find_template(template_id)
            .ok_or_else(|| SessionError::UnknownTemplate(template_id.to_string()))?;
        Ok(template.compose(draft))
    }

    /// Put a message of the active chat on the clipboard
    pub fn copy_message(&self, message_id: &MessageId) -> Result<(), SessionError> {
        let text = self
            .inner
            .store
            .read(|s| {
                s.active_chat()
                    .and_then(|chat| chat.message(message_id))
                    .map(|m| m.content.clone())
            })
            .ok_or_else(|| SessionError::UnknownMessage(message_id.clone()))?;
        self.inner.clipboard.write_text(&text)?;
        Ok(())
    }

    /// Encode the active chat and hand it to `sink`.
    ///
    /// Only one export runs at a time; the store is not touched.
    pub async fn export_active(
        &self,
        format: ExportFormat,
        sink: &dyn FileSink,
    ) -> Result<ExportReceipt, ExportError> {
        let chat = self
            .inner
            .store
            .read(|s| s.active_chat().cloned())
            .ok_or(ExportError::NoActiveChat)?;

        if self.inner.exporting.swap(true, Ordering::AcqRel) {
            return Err(ExportError::Busy);
        }
        let _guard = ExportGuard(&self.inner.exporting);

        let result = async {
            let bytes = export::encode(&chat, format, self.inner.clock.now())?;
            let file_name = export::file_name(&chat.title, format);
            let location = sink.deliver(&file_name, format.mime_type(), &bytes).await?;
            Ok::<_, ExportError>(ExportReceipt {
                file_name,
                location,
                size: bytes.len(),
            })
        }
        .await;

        match &result {
            Ok(receipt) => tracing::info!(
                chat_id = %chat.id,
                format = format.extension(),
                location = %receipt.location,
                size = receipt.size,
                "Chat exported"
            ),
            Err(e) => tracing::error!(
                chat_id = %chat.id,
                format = format.extension(),
                error = %e,
                "Export failed"
            ),
        }
        result
    }
}
