//! Inline button presses

use teloxide::prelude::*;
use teloxide::types::CallbackQuery;

use super::types::{display_name, storage_user_id, HandlerDeps};
use crate::core::{metrics, AppResult};
use crate::domain::{format_amount_plain, ExpenseDate, NewExpense};
use crate::telegram::conversation::{ConversationKey, ConversationState};
use crate::telegram::keyboards::CallbackAction;

/// Chat a callback belongs to; falls back to the private chat with the sender.
pub fn callback_chat_id(q: &CallbackQuery) -> ChatId {
    q.message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or_else(|| ChatId(storage_user_id(&q.from)))
}

/// Answers the query, then acts on it if it matches the sender's step.
pub async fn handle_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> AppResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
        log::warn!("Unknown callback data {:?} from {}", q.data, q.from.id);
        return Ok(());
    };

    let key = ConversationKey::new(callback_chat_id(q), q.from.id);
    match action {
        CallbackAction::PickCategory(category) => {
            let taken = deps
                .conversations
                .take_if(key, |s| matches!(s, ConversationState::AwaitingCategory { .. }))
                .await;
            let Some(ConversationState::AwaitingCategory { amount }) = taken else {
                log::debug!("Stale category button {:?} from {:?}", category, key);
                return Ok(());
            };
            category_selected(bot, q, deps, key, amount, &category).await
        }
        CallbackAction::DeleteCategory(category) => {
            let taken = deps
                .conversations
                .take_if(key, |s| matches!(s, ConversationState::AwaitingDeletion))
                .await;
            if taken.is_none() {
                log::debug!("Stale delete button {:?} from {:?}", category, key);
                return Ok(());
            }
            let removed = deps.store.delete_category(&category).await?;
            log::info!("Category {:?} deleted by {:?} ({} rows)", category, key, removed);
            edit_or_send(
                bot,
                q,
                format!("Категория '{}' удалена для всех пользователей.", category),
            )
            .await
        }
    }
}

async fn category_selected(
    bot: &Bot,
    q: &CallbackQuery,
    deps: &HandlerDeps,
    key: ConversationKey,
    amount: f64,
    category: &str,
) -> AppResult<()> {
    let expense = NewExpense {
        user_id: storage_user_id(&q.from),
        amount,
        category: category.to_string(),
        date: ExpenseDate::from_naive(deps.today()),
        username: display_name(&q.from),
    };

    if let Err(e) = deps.store.insert_expense(&expense).await {
        // Let the user pick again once the database is back
        deps.conversations
            .set(key, ConversationState::AwaitingCategory { amount })
            .await;
        return Err(e);
    }

    metrics::record_expense(category, amount);
    log::info!("Recorded {} in {:?} for {:?}", amount, category, key);
    edit_or_send(
        bot,
        q,
        format!("Сохранил: {}$ — {}", format_amount_plain(amount), category),
    )
    .await
}

/// Replaces the keyboard message text, or sends a new message when the
/// keyboard message is no longer reachable.
async fn edit_or_send(bot: &Bot, q: &CallbackQuery, text: String) -> AppResult<()> {
    match &q.message {
        Some(message) => {
            bot.edit_message_text(message.chat().id, message.id(), text).await?;
        }
        None => {
            bot.send_message(callback_chat_id(q), text).await?;
        }
    }
    Ok(())
}
