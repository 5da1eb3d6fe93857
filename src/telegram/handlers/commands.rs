//! Slash command handlers

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{message_key, send_all, storage_user_id, HandlerDeps};
use crate::core::AppResult;
use crate::domain::MonthPeriod;
use crate::reports::{self, MonthReportKind};
use crate::telegram::bot::HELP_TEXT;
use crate::telegram::conversation::ConversationState;
use crate::telegram::keyboards::delete_keyboard;

const MONTH_USAGE: &str = "Используйте формат: /month MM/YYYY (например, /month 04/2025)";
const MONTH_BAD_FORMAT: &str = "Неверный формат. Используйте: /month MM/YYYY";

/// /start: makes sure the sender has their own copy of the default categories.
pub async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    if let Some(user) = msg.from.as_ref() {
        let categories = deps.store.user_categories(storage_user_id(user)).await?;
        log::debug!("User {} has {} categories", user.id, categories.len());
    }
    bot.send_message(
        msg.chat.id,
        "Привет! Для добавления расхода используй /add\nДля справки используй /help.",
    )
    .await?;
    Ok(())
}

pub async fn handle_help_command(bot: &Bot, msg: &Message) -> AppResult<()> {
    bot.send_message(msg.chat.id, HELP_TEXT).await?;
    Ok(())
}

pub async fn handle_add_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    if let Some(key) = message_key(msg) {
        deps.conversations.set(key, ConversationState::AwaitingAmount).await;
    }
    bot.send_message(msg.chat.id, "Введите сумму расхода:").await?;
    Ok(())
}

pub async fn handle_report_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let expenses = deps.store.expenses().await?;
    send_all(bot, msg.chat.id, reports::overview_report(&expenses, deps.today())).await
}

pub async fn handle_prev_month_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let period = MonthPeriod::current(deps.today()).previous();
    let expenses = deps.store.monthly_expenses(period).await?;
    send_all(
        bot,
        msg.chat.id,
        reports::month_report(&expenses, period, MonthReportKind::Previous),
    )
    .await
}

/// /month MM/YYYY
pub async fn handle_month_command(bot: &Bot, msg: &Message, deps: &HandlerDeps, args: &str) -> AppResult<()> {
    let args: Vec<&str> = args.split_whitespace().collect();
    let [arg] = args.as_slice() else {
        bot.send_message(msg.chat.id, MONTH_USAGE).await?;
        return Ok(());
    };

    let period = match MonthPeriod::parse(arg) {
        Ok(period) => period,
        Err(e) => {
            log::info!("Rejected /month argument {:?}: {}", arg, e);
            crate::core::metrics::record_invalid_input("month");
            bot.send_message(msg.chat.id, MONTH_BAD_FORMAT).await?;
            return Ok(());
        }
    };

    let expenses = deps.store.monthly_expenses(period).await?;
    send_all(
        bot,
        msg.chat.id,
        reports::month_report(&expenses, period, MonthReportKind::Requested),
    )
    .await
}

pub async fn handle_clear_command(bot: &Bot, msg: &Message) -> AppResult<()> {
    bot.send_message(
        msg.chat.id,
        "⚠️ Внимание! Эта команда удалит все расходы для всех пользователей. Продолжить? /confirmclear для подтверждения",
    )
    .await?;
    Ok(())
}

pub async fn handle_confirm_clear_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let removed = deps.store.clear_all_expenses().await?;
    log::warn!("Chat {} cleared all expenses ({} rows)", msg.chat.id, removed);
    bot.send_message(msg.chat.id, "Все расходы очищены.").await?;
    Ok(())
}

pub async fn handle_categories_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let categories = deps.store.categories().await?;
    bot.send_message(msg.chat.id, reports::category_list(&categories)).await?;
    Ok(())
}

pub async fn handle_add_category_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    if let Some(key) = message_key(msg) {
        deps.conversations.set(key, ConversationState::AwaitingCategoryName).await;
    }
    bot.send_message(msg.chat.id, "Введите название новой категории:").await?;
    Ok(())
}

pub async fn handle_delete_category_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let categories = deps.store.categories().await?;
    if categories.is_empty() {
        bot.send_message(msg.chat.id, "Нет категорий для удаления.").await?;
        return Ok(());
    }

    if let Some(key) = message_key(msg) {
        deps.conversations.set(key, ConversationState::AwaitingDeletion).await;
    }
    bot.send_message(msg.chat.id, "Выберите категорию для удаления:")
        .reply_markup(delete_keyboard(&categories))
        .await?;
    Ok(())
}

pub async fn handle_cancel_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    if let Some(key) = message_key(msg) {
        if let Some(state) = deps.conversations.clear(key).await {
            log::debug!("Cancelled {:?} for {:?}", state, key);
        }
    }
    bot.send_message(msg.chat.id, "Операция отменена.").await?;
    Ok(())
}
