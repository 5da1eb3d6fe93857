//! Plain text replies inside a conversation

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{message_key, HandlerDeps};
use crate::core::config::categories::{MAX_NAME_BYTES, SHARED_OWNER};
use crate::core::{metrics, AppResult};
use crate::domain::parse_amount;
use crate::telegram::conversation::{ConversationKey, ConversationState};
use crate::telegram::keyboards::category_keyboard;

/// Routes a non-command text message to the step the sender is on.
/// Text outside a conversation, or while a button is expected, is ignored.
pub async fn handle_conversation_text(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let (Some(key), Some(text)) = (message_key(msg), msg.text()) else {
        return Ok(());
    };

    match deps.conversations.get(key).await {
        Some(ConversationState::AwaitingAmount) => amount_entered(bot, msg, deps, key, text).await,
        Some(ConversationState::AwaitingCategoryName) => category_name_entered(bot, msg, deps, key, text).await,
        Some(state) => {
            log::debug!("Ignoring text while {:?} waits for a button", state);
            Ok(())
        }
        None => Ok(()),
    }
}

async fn amount_entered(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    key: ConversationKey,
    text: &str,
) -> AppResult<()> {
    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(e) => {
            log::info!("Invalid amount {:?} from {:?}: {}", text, key, e);
            metrics::record_invalid_input("amount");
            bot.send_message(msg.chat.id, "Пожалуйста, введите корректное число. Попробуйте снова:")
                .await?;
            return Ok(());
        }
    };

    let categories = deps.store.categories().await?;
    deps.conversations
        .set(key, ConversationState::AwaitingCategory { amount })
        .await;
    bot.send_message(msg.chat.id, "Выберите категорию:")
        .reply_markup(category_keyboard(&categories))
        .await?;
    Ok(())
}

async fn category_name_entered(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    key: ConversationKey,
    text: &str,
) -> AppResult<()> {
    let name = text.trim();
    if name.is_empty() {
        bot.send_message(msg.chat.id, "Название категории не может быть пустым. Попробуйте снова.")
            .await?;
        return Ok(());
    }

    let categories = deps.store.categories().await?;
    if categories.iter().any(|c| c == name) {
        deps.conversations.clear(key).await;
        bot.send_message(msg.chat.id, format!("Категория '{}' уже существует.", name))
            .await?;
        return Ok(());
    }

    // Button payloads carry the name and Telegram caps them at 64 bytes
    if name.len() > MAX_NAME_BYTES {
        metrics::record_invalid_input("category_name");
        bot.send_message(
            msg.chat.id,
            format!("Название категории слишком длинное (максимум {} байт).", MAX_NAME_BYTES),
        )
        .await?;
        return Ok(());
    }

    deps.store.insert_category(SHARED_OWNER, name).await?;
    deps.conversations.clear(key).await;
    log::info!("Category {:?} added by {:?}", name, key);
    bot.send_message(
        msg.chat.id,
        format!("Категория '{}' добавлена для всех пользователей!", name),
    )
    .await?;
    Ok(())
}
