//! Per-user conversation state for the multi-step flows
//!
//! `/add`, `/add_category` and `/delete_category` each start a short
//! dialogue. The step a user is on lives here, keyed by chat and user so that
//! two people adding expenses in the same group chat do not interfere.
//! Starting any flow replaces whatever flow the user was in before.

use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::{ChatId, UserId};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat_id: ChatId,
    pub user_id: UserId,
}

impl ConversationKey {
    pub fn new(chat_id: ChatId, user_id: UserId) -> Self {
        Self { chat_id, user_id }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationState {
    /// `/add` sent, waiting for the amount text
    AwaitingAmount,
    /// Amount accepted, waiting for a category button
    AwaitingCategory { amount: f64 },
    /// `/add_category` sent, waiting for the new name
    AwaitingCategoryName,
    /// `/delete_category` sent, waiting for a delete button
    AwaitingDeletion,
}

/// Shared conversation table
#[derive(Clone, Default)]
pub struct Conversations {
    states: Arc<Mutex<HashMap<ConversationKey, ConversationState>>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: ConversationKey) -> Option<ConversationState> {
        self.states.lock().await.get(&key).cloned()
    }

    pub async fn set(&self, key: ConversationKey, state: ConversationState) {
        self.states.lock().await.insert(key, state);
    }

    /// Ends the user's flow, returning the step they were on.
    pub async fn clear(&self, key: ConversationKey) -> Option<ConversationState> {
        self.states.lock().await.remove(&key)
    }

    /// Removes the entry only if it still holds `expected`.
    ///
    /// Used by callbacks so that a double tap on the same button is handled once.
    pub async fn take_if(&self, key: ConversationKey, expected: impl Fn(&ConversationState) -> bool) -> Option<ConversationState> {
        let mut states = self.states.lock().await;
        match states.get(&key) {
            Some(state) if expected(state) => states.remove(&key),
            _ => None,
        }
    }
}
