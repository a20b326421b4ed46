//! Conversation store
//!
//! Elm-style state container: an [`Action`] stream folded through the pure
//! [`apply`] function. [`Store`] owns the current state and publishes every
//! new snapshot to subscribers.

mod action;
mod dispatcher;
mod reducer;
mod state;

#[cfg(test)]
mod proptests;

pub use action::Action;
pub use dispatcher::Store;
pub use reducer::{apply, Duplicate, Outcome, Transition};
pub use state::StoreState;
