//! Actions accepted by the store

use crate::types::{AiModel, Chat, ChatId, Message, ParameterUpdate};

#[derive(Debug, Clone)]
pub enum Action {
    /// Select a chat by id; `None` (or an unknown id) clears the selection
    SetActiveChat(Option<ChatId>),
    AddMessage {
        chat_id: ChatId,
        message: Message,
    },
    /// Prepend a chat and make it active
    CreateChat(Chat),
    DeleteChat(ChatId),
    SetModel(AiModel),
    UpdateParameters(ParameterUpdate),
    SetLoading(bool),
    ToggleSidebar,
    SetSidebarOpen(bool),
}

impl Action {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetActiveChat(_) => "set_active_chat",
            Action::AddMessage { .. } => "add_message",
            Action::CreateChat(_) => "create_chat",
            Action::DeleteChat(_) => "delete_chat",
            Action::SetModel(_) => "set_model",
            Action::UpdateParameters(_) => "update_parameters",
            Action::SetLoading(_) => "set_loading",
            Action::ToggleSidebar => "toggle_sidebar",
            Action::SetSidebarOpen(_) => "set_sidebar_open",
        }
    }
}
