//! Handler types, dependencies, and shared reply helpers

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use teloxide::prelude::*;
use teloxide::types::{Message, User};

use crate::core::metrics;
use crate::core::AppError;
use crate::storage::ExpenseStore;
use crate::telegram::conversation::{ConversationKey, Conversations};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Source of "today" for dates and reports
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub const STORAGE_ERROR_TEXT: &str = "Ошибка базы данных. Попробуйте позже.";

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub store: Arc<dyn ExpenseStore>,
    pub conversations: Conversations,
    pub clock: Clock,
}

impl HandlerDeps {
    /// Create new handler dependencies using the local date
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self {
            store,
            conversations: Conversations::new(),
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Pins "today", mostly for tests.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

/// Telegram user id as stored in the `user_id` columns
pub fn storage_user_id(user: &User) -> i64 {
    i64::try_from(user.id.0).unwrap_or(0)
}

/// Name recorded next to an expense: the @username, or the first name.
pub fn display_name(user: &User) -> String {
    user.username.clone().unwrap_or_else(|| user.first_name.clone())
}

/// Conversation key for a message; `None` when the sender is unknown.
pub fn message_key(msg: &Message) -> Option<ConversationKey> {
    msg.from.as_ref().map(|user| ConversationKey::new(msg.chat.id, user.id))
}

/// Sends each message in order
pub async fn send_all(bot: &Bot, chat_id: ChatId, messages: Vec<String>) -> Result<(), AppError> {
    for text in messages {
        bot.send_message(chat_id, text).await?;
    }
    Ok(())
}

/// Logs a failed handler and tells the user when the store was at fault.
pub async fn report_failure(bot: &Bot, chat_id: ChatId, context: &str, err: AppError) {
    if err.is_storage() {
        metrics::STORAGE_ERRORS_TOTAL.inc();
        log::error!("❌ {} failed for chat {}: database error: {}", context, chat_id, err);
        if let Err(e) = bot.send_message(chat_id, STORAGE_ERROR_TEXT).await {
            log::error!("Failed to notify chat {} about database error: {}", chat_id, e);
        }
    } else {
        log::error!("❌ {} failed for chat {}: {}", context, chat_id, err);
    }
}
