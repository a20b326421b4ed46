//! Store state

use crate::catalog::{self, DEFAULT_PARAMETERS};
use crate::types::{AiModel, Chat, ChatId, ChatParameters};
use std::collections::HashSet;
use std::sync::Arc;

/// Snapshot of a session.
///
/// Chats are shared behind `Arc`; a transition that changes a chat swaps in
/// a new `Arc`, so a chat handed out earlier never changes under its holder.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub(super) chats: Vec<Arc<Chat>>,
    pub(super) active_chat: Option<ChatId>,
    pub(super) selected_model: AiModel,
    pub(super) parameters: ChatParameters,
    pub(super) loading: bool,
    pub(super) sidebar_open: bool,
}

impl StoreState {
    /// State over `chats` (most recent first) with the first chat active.
    ///
    /// Later chats that repeat an earlier id are dropped.
    pub fn new(chats: Vec<Chat>, selected_model: AiModel, parameters: ChatParameters) -> Self {
        let mut seen = HashSet::new();
        let chats: Vec<Arc<Chat>> = chats
            .into_iter()
            .filter(|chat| seen.insert(chat.id.clone()))
            .map(Arc::new)
            .collect();
        let active_chat = chats.first().map(|c| c.id.clone());
        Self {
            chats,
            active_chat,
            selected_model,
            parameters,
            loading: false,
            sidebar_open: false,
        }
    }

    /// Seed conversations, default model and default parameters
    pub fn seeded() -> Self {
        Self::new(catalog::seed_chats(), catalog::default_model(), DEFAULT_PARAMETERS)
    }

    /// No chats at all
    pub fn empty(selected_model: AiModel) -> Self {
        Self::new(Vec::new(), selected_model, DEFAULT_PARAMETERS)
    }

    pub fn chats(&self) -> &[Arc<Chat>] {
        &self.chats
    }

    pub fn chat(&self, id: &ChatId) -> Option<&Arc<Chat>> {
        self.chats.iter().find(|c| &c.id == id)
    }

    pub(super) fn position(&self, id: &ChatId) -> Option<usize> {
        self.chats.iter().position(|c| &c.id == id)
    }

    pub fn active_chat_id(&self) -> Option<&ChatId> {
        self.active_chat.as_ref()
    }

    pub fn active_chat(&self) -> Option<&Arc<Chat>> {
        self.active_chat.as_ref().and_then(|id| self.chat(id))
    }

    pub fn selected_model(&self) -> &AiModel {
        &self.selected_model
    }

    pub fn parameters(&self) -> &ChatParameters {
        &self.parameters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::seeded()
    }
}
