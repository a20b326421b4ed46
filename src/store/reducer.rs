//! Pure state transition function
//!
//! `apply` never fails and never performs I/O. Actions aimed at a chat that
//! does not exist leave the state unchanged; the [`Outcome`] says so, so
//! callers can log or assert on it instead of the miss being silent.

use super::{Action, StoreState};
use crate::types::{ChatId, MessageId, ParamField};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct Transition {
    pub new_state: StoreState,
    pub outcome: Outcome,
}

impl Transition {
    fn applied(state: StoreState) -> Self {
        Self {
            new_state: state,
            outcome: Outcome::Applied,
        }
    }

    fn unchanged(state: &StoreState, outcome: Outcome) -> Self {
        Self {
            new_state: state.clone(),
            outcome,
        }
    }
}

/// How an action was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Parameters merged, with the listed fields forced into range
    Clamped { fields: Vec<ParamField> },
    /// The action named a chat that is not in the store
    UnknownChat(ChatId),
    /// The action would have introduced a repeated id; state unchanged
    Duplicate(Duplicate),
}

impl Outcome {
    /// True when the action's target could not be resolved or was refused
    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::UnknownChat(_) | Outcome::Duplicate(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Duplicate {
    #[error("chat {0} already exists")]
    Chat(ChatId),
    #[error("message {message_id} already exists in chat {chat_id}")]
    Message {
        chat_id: ChatId,
        message_id: MessageId,
    },
}

/// Pure transition function.
///
/// `now` is the dispatcher's clock reading; it only feeds `updated_at` when
/// a message is appended.
pub fn apply(state: &StoreState, action: Action, now: DateTime<Utc>) -> Transition {
    match action {
        Action::SetActiveChat(None) => {
            let mut next = state.clone();
            next.active_chat = None;
            Transition::applied(next)
        }

        Action::SetActiveChat(Some(id)) => {
            let mut next = state.clone();
            if state.position(&id).is_some() {
                next.active_chat = Some(id);
                Transition::applied(next)
            } else {
                next.active_chat = None;
                Transition {
                    new_state: next,
                    outcome: Outcome::UnknownChat(id),
                }
            }
        }

        Action::AddMessage { chat_id, message } => {
            let Some(pos) = state.position(&chat_id) else {
                return Transition::unchanged(state, Outcome::UnknownChat(chat_id));
            };
            let chat = &state.chats[pos];
            if chat.contains_message(&message.id) {
                return Transition::unchanged(
                    state,
                    Outcome::Duplicate(Duplicate::Message {
                        chat_id,
                        message_id: message.id,
                    }),
                );
            }
            let mut next = state.clone();
            next.chats[pos] = Arc::new(chat.with_message(message, now));
            Transition::applied(next)
        }

        Action::CreateChat(chat) => {
            if state.position(&chat.id).is_some() {
                return Transition::unchanged(state, Outcome::Duplicate(Duplicate::Chat(chat.id)));
            }
            let mut next = state.clone();
            next.active_chat = Some(chat.id.clone());
            next.chats.insert(0, Arc::new(chat));
            Transition::applied(next)
        }

        Action::DeleteChat(id) => {
            let Some(pos) = state.position(&id) else {
                return Transition::unchanged(state, Outcome::UnknownChat(id));
            };
            let mut next = state.clone();
            next.chats.remove(pos);
            if next.active_chat.as_ref() == Some(&id) {
                next.active_chat = next.chats.first().map(|c| c.id.clone());
            }
            Transition::applied(next)
        }

        Action::SetModel(model) => {
            let mut next = state.clone();
            next.selected_model = model;
            Transition::applied(next)
        }

        Action::UpdateParameters(update) => {
            let (parameters, clamped) = state.parameters.merged(&update);
            let mut next = state.clone();
            next.parameters = parameters;
            if clamped.is_empty() {
                Transition::applied(next)
            } else {
                Transition {
                    new_state: next,
                    outcome: Outcome::Clamped { fields: clamped },
                }
            }
        }

        Action::SetLoading(loading) => {
            let mut next = state.clone();
            next.loading = loading;
            Transition::applied(next)
        }

        Action::ToggleSidebar => {
            let mut next = state.clone();
            next.sidebar_open = !state.sidebar_open;
            Transition::applied(next)
        }

        Action::SetSidebarOpen(open) => {
            let mut next = state.clone();
            next.sidebar_open = open;
            Transition::applied(next)
        }
    }
}
