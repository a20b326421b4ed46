//! Store: owns the current state and applies actions to it

use super::{apply, Action, Outcome, StoreState};
use crate::clock::Clock;
use std::sync::Arc;
use tokio::sync::watch;

/// Single source of truth for a session.
///
/// Every dispatch folds one action into the latest state inside the watch
/// channel, so concurrent readers only ever see complete snapshots.
pub struct Store {
    state: watch::Sender<StoreState>,
    clock: Arc<dyn Clock>,
}

impl Store {
    pub fn new(initial: StoreState, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state, clock }
    }

    /// Apply `action` and notify subscribers
    pub fn dispatch(&self, action: Action) -> Outcome {
        let kind = action.kind();
        let now = self.clock.now();
        let mut outcome = Outcome::Applied;

        self.state.send_modify(|state| {
            let transition = apply(state, action, now);
            *state = transition.new_state;
            outcome = transition.outcome;
        });

        match &outcome {
            Outcome::Applied => tracing::trace!(action = kind, "Action applied"),
            Outcome::Clamped { fields } => tracing::debug!(
                action = kind,
                fields = ?fields,
                "Parameter update clamped into range"
            ),
            Outcome::UnknownChat(chat_id) => tracing::debug!(
                action = kind,
                chat_id = %chat_id,
                "Action targeted an unknown chat"
            ),
            Outcome::Duplicate(dup) => tracing::debug!(
                action = kind,
                reason = %dup,
                "Action ignored"
            ),
        }

        outcome
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receiver that observes every new snapshot
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }
}
