//! Property-based tests for the store
//!
//! These tests verify key invariants hold across arbitrary action sequences.

use super::state::StoreState;
use super::*;
use crate::catalog::{self, DEFAULT_PARAMETERS};
use crate::types::{Chat, ChatId, Message, MessageId, ParameterUpdate, Role};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn initial_state() -> StoreState {
    StoreState::new(
        ["a", "b", "c"]
            .into_iter()
            .map(|id| Chat::new(ChatId::from(id), id, epoch()))
            .collect(),
        catalog::default_model(),
        DEFAULT_PARAMETERS,
    )
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Small id space so actions frequently collide with existing chats
fn arb_chat_id() -> impl Strategy<Value = ChatId> {
    prop_oneof![Just("a"), Just("b"), Just("c"), Just("d"), Just("e")].prop_map(ChatId::from)
}

fn arb_message_id() -> impl Strategy<Value = MessageId> {
    "m[0-9]{1,2}".prop_map(MessageId::from)
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant)]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (arb_message_id(), "[a-zA-Z ]{0,20}", arb_role(), -3600i64..3600).prop_map(
        |(id, content, role, offset)| Message {
            id,
            content,
            role,
            timestamp: epoch() + Duration::seconds(offset),
            model: None,
        },
    )
}

fn arb_chat() -> impl Strategy<Value = Chat> {
    (arb_chat_id(), "[a-zA-Z ]{1,12}", 0i64..3600)
        .prop_map(|(id, title, offset)| Chat::new(id, title, epoch() + Duration::seconds(offset)))
}

fn arb_parameter_update() -> impl Strategy<Value = ParameterUpdate> {
    (
        proptest::option::of(-5.0f64..5.0),
        proptest::option::of(0u32..10_000),
        proptest::option::of(-1.0f64..2.0),
        proptest::option::of(-4.0f64..4.0),
    )
        .prop_map(|(temperature, max_tokens, top_p, frequency_penalty)| ParameterUpdate {
            temperature,
            max_tokens,
            top_p,
            frequency_penalty,
        })
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        proptest::option::of(arb_chat_id()).prop_map(Action::SetActiveChat),
        (arb_chat_id(), arb_message())
            .prop_map(|(chat_id, message)| Action::AddMessage { chat_id, message }),
        arb_chat().prop_map(Action::CreateChat),
        arb_chat_id().prop_map(Action::DeleteChat),
        proptest::sample::select(catalog::all_models()).prop_map(Action::SetModel),
        arb_parameter_update().prop_map(Action::UpdateParameters),
        any::<bool>().prop_map(Action::SetLoading),
        Just(Action::ToggleSidebar),
        any::<bool>().prop_map(Action::SetSidebarOpen),
    ]
}

/// Actions paired with the clock offset (seconds) they are applied at
fn arb_script() -> impl Strategy<Value = Vec<(Action, i64)>> {
    proptest::collection::vec((arb_action(), -600i64..7200), 0..40)
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn check_invariants(state: &StoreState) -> Result<(), String> {
    let mut chat_ids = HashSet::new();
    for chat in state.chats() {
        if !chat_ids.insert(&chat.id) {
            return Err(format!("duplicate chat id {}", chat.id));
        }
        if chat.updated_at < chat.created_at {
            return Err(format!("chat {} updated before created", chat.id));
        }
        let mut message_ids = HashSet::new();
        for message in &chat.messages {
            if !message_ids.insert(&message.id) {
                return Err(format!("duplicate message {} in {}", message.id, chat.id));
            }
        }
    }
    if let Some(active) = state.active_chat_id() {
        if !chat_ids.contains(active) {
            return Err(format!("active chat {active} is not in the set"));
        }
    }
    if !state.parameters().is_within_bounds() {
        return Err(format!("parameters out of bounds: {:?}", state.parameters()));
    }
    Ok(())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Every reachable state is valid
    #[test]
    fn prop_actions_preserve_invariants(script in arb_script()) {
        let mut state = initial_state();
        for (action, offset) in script {
            state = apply(&state, action, epoch() + Duration::seconds(offset)).new_state;
            if let Err(reason) = check_invariants(&state) {
                prop_assert!(false, "{}", reason);
            }
        }
    }

    // Invariant 2: The transition function is deterministic
    #[test]
    fn prop_apply_is_deterministic(script in arb_script()) {
        let mut left = initial_state();
        let mut right = initial_state();
        for (action, offset) in script {
            let now = epoch() + Duration::seconds(offset);
            let a = apply(&left, action.clone(), now);
            let b = apply(&right, action, now);
            prop_assert_eq!(&a.new_state, &b.new_state);
            prop_assert_eq!(&a.outcome, &b.outcome);
            left = a.new_state;
            right = b.new_state;
        }
    }

    // Invariant 3: Chats observed before an action are never changed by it
    #[test]
    fn prop_observed_chats_never_mutate(script in arb_script(), message in arb_message()) {
        let mut state = initial_state();
        for (action, offset) in script {
            state = apply(&state, action, epoch() + Duration::seconds(offset)).new_state;
        }
        let observed: Vec<(Arc<Chat>, Chat)> = state
            .chats()
            .iter()
            .map(|c| (Arc::clone(c), Chat::clone(c)))
            .collect();

        for (handle, copy) in &observed {
            let _ = apply(
                &state,
                Action::AddMessage { chat_id: handle.id.clone(), message: message.clone() },
                epoch(),
            );
            prop_assert_eq!(&**handle, copy);
        }
    }

    // Invariant 4: Ignored actions leave the state untouched
    #[test]
    fn prop_ignored_actions_are_noops(script in arb_script(), action in arb_action()) {
        let mut state = initial_state();
        for (action, offset) in script {
            state = apply(&state, action, epoch() + Duration::seconds(offset)).new_state;
        }
        let is_selection = matches!(action, Action::SetActiveChat(_));
        let result = apply(&state, action, epoch());
        if result.outcome.is_ignored() && !is_selection {
            prop_assert_eq!(result.new_state, state);
        }
    }

    // Invariant 5: CreateChat of a fresh id puts it first and makes it active
    #[test]
    fn prop_create_chat_becomes_first_and_active(script in arb_script(), title in "[a-z]{1,8}") {
        let mut state = initial_state();
        for (action, offset) in script {
            state = apply(&state, action, epoch() + Duration::seconds(offset)).new_state;
        }
        let fresh = Chat::new(ChatId::from("fresh"), title, epoch());
        let next = apply(&state, Action::CreateChat(fresh.clone()), epoch()).new_state;
        prop_assert_eq!(next.chats().first().map(|c| &**c), Some(&fresh));
        prop_assert_eq!(next.active_chat().map(|c| &**c), Some(&fresh));
        prop_assert_eq!(next.chats().len(), state.chats().len() + 1);
    }

    // Invariant 6: A deleted chat can no longer be selected
    #[test]
    fn prop_deleted_chat_not_selectable(script in arb_script(), id in arb_chat_id()) {
        let mut state = initial_state();
        for (action, offset) in script {
            state = apply(&state, action, epoch() + Duration::seconds(offset)).new_state;
        }
        let deleted = apply(&state, Action::DeleteChat(id.clone()), epoch()).new_state;
        let selected = apply(&deleted, Action::SetActiveChat(Some(id)), epoch()).new_state;
        prop_assert!(selected.active_chat_id().is_none());
    }

    // Invariant 7: Deleting the active chat selects the new first chat
    #[test]
    fn prop_delete_active_falls_back(script in arb_script()) {
        let mut state = initial_state();
        for (action, offset) in script {
            state = apply(&state, action, epoch() + Duration::seconds(offset)).new_state;
        }
        if let Some(active) = state.active_chat_id().cloned() {
            let next = apply(&state, Action::DeleteChat(active), epoch()).new_state;
            let expected = next.chats().first().map(|c| c.id.clone());
            prop_assert_eq!(next.active_chat_id().cloned(), expected);
        }
    }

    // Invariant 8: Toggling the sidebar twice is the identity
    #[test]
    fn prop_toggle_sidebar_twice(open in any::<bool>()) {
        let state = apply(&initial_state(), Action::SetSidebarOpen(open), epoch()).new_state;
        let once = apply(&state, Action::ToggleSidebar, epoch()).new_state;
        let twice = apply(&once, Action::ToggleSidebar, epoch()).new_state;
        prop_assert_eq!(once.sidebar_open(), !open);
        prop_assert_eq!(twice, state);
    }
}
