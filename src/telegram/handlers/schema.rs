//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

use super::callbacks::{callback_chat_id, handle_callback};
use super::commands::{
    handle_add_category_command, handle_add_command, handle_cancel_command, handle_categories_command,
    handle_clear_command, handle_confirm_clear_command, handle_delete_category_command, handle_help_command,
    handle_month_command, handle_prev_month_command, handle_report_command, handle_start_command,
};
use super::messages::handle_conversation_text;
use super::types::{report_failure, HandlerDeps, HandlerError};
use crate::core::metrics;
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same schema is used in production and in integration tests.
///
/// # Arguments
/// * `deps` - Handler dependencies (store, conversation state, clock)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        // Conversation replies (plain text, not commands)
        .branch(conversation_text_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);
                metrics::record_command(cmd.name());

                let result = match &cmd {
                    Command::Start => handle_start_command(&bot, &msg, &deps).await,
                    Command::Help => handle_help_command(&bot, &msg).await,
                    Command::Add => handle_add_command(&bot, &msg, &deps).await,
                    Command::Report => handle_report_command(&bot, &msg, &deps).await,
                    Command::PrevMonth => handle_prev_month_command(&bot, &msg, &deps).await,
                    Command::Month(args) => handle_month_command(&bot, &msg, &deps, args).await,
                    Command::Clear => handle_clear_command(&bot, &msg).await,
                    Command::ConfirmClear => handle_confirm_clear_command(&bot, &msg, &deps).await,
                    Command::Categories => handle_categories_command(&bot, &msg, &deps).await,
                    Command::AddCategory => handle_add_category_command(&bot, &msg, &deps).await,
                    Command::DeleteCategory => handle_delete_category_command(&bot, &msg, &deps).await,
                    Command::Cancel => handle_cancel_command(&bot, &msg, &deps).await,
                };

                if let Err(e) = result {
                    report_failure(&bot, msg.chat.id, &format!("/{}", cmd.name()), e).await;
                }
                Ok(())
            }
        },
    ))
}

fn conversation_text_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().map(|text| !text.starts_with('/')).unwrap_or(false))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Err(e) = handle_conversation_text(&bot, &msg, &deps).await {
                    report_failure(&bot, msg.chat.id, "conversation reply", e).await;
                }
                Ok(())
            }
        })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            if let Err(e) = handle_callback(&bot, &q, &deps).await {
                report_failure(&bot, callback_chat_id(&q), "callback", e).await;
            }
            Ok(())
        }
    })
}
