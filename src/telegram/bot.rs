//! Bot initialization and the command list
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Registration of the command list in the Telegram UI

use indoc::indoc;
use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "справка по командам")]
    Help,
    #[command(description = "добавить новый расход")]
    Add,
    #[command(description = "отчёт о расходах за текущий месяц")]
    Report,
    #[command(description = "подробный отчёт за предыдущий месяц")]
    PrevMonth,
    #[command(description = "отчёт за конкретный месяц (MM/YYYY)")]
    Month(String),
    #[command(description = "очистить все записи о расходах")]
    Clear,
    #[command(rename = "confirmclear", description = "подтвердить очистку расходов")]
    ConfirmClear,
    #[command(description = "список категорий")]
    Categories,
    #[command(description = "добавить новую категорию")]
    AddCategory,
    #[command(description = "удалить категорию")]
    DeleteCategory,
    #[command(description = "отменить текущую операцию")]
    Cancel,
}

impl Command {
    /// Name used as a metrics label
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Add => "add",
            Command::Report => "report",
            Command::PrevMonth => "prev_month",
            Command::Month(_) => "month",
            Command::Clear => "clear",
            Command::ConfirmClear => "confirmclear",
            Command::Categories => "categories",
            Command::AddCategory => "add_category",
            Command::DeleteCategory => "delete_category",
            Command::Cancel => "cancel",
        }
    }
}

pub const HELP_TEXT: &str = indoc! {"
    Доступные команды:
    /start - начать работу с ботом
    /add - добавить новый расход
    /report - получить отчёт о расходах за текущий месяц
    /prev_month - подробный отчёт за предыдущий месяц
    /month MM/YYYY - отчёт за конкретный месяц
    /clear - очистить все записи о расходах
    /categories - управление категориями
    /add_category - добавить новую категорию
    /delete_category - удалить категорию
"};

/// Creates a Bot instance from BOT_TOKEN (or TELOXIDE_TOKEN)
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Token missing or HTTP client could not be built
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.as_str();
    if token.is_empty() {
        return Err(anyhow::anyhow!(
            "Bot token not found. Set BOT_TOKEN in the environment or .env"
        ));
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_match_telegram_commands() {
        let registered: Vec<String> = Command::bot_commands().into_iter().map(|c| c.command).collect();
        for expected in [
            "/start",
            "/help",
            "/add",
            "/report",
            "/prev_month",
            "/month",
            "/clear",
            "/confirmclear",
            "/categories",
            "/add_category",
            "/delete_category",
            "/cancel",
        ] {
            assert!(registered.iter().any(|c| c == expected), "{} is not registered", expected);
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/prev_month", "fintrack_bot").unwrap(), Command::PrevMonth);
        assert_eq!(Command::parse("/confirmclear", "fintrack_bot").unwrap(), Command::ConfirmClear);
        assert_eq!(
            Command::parse("/month 04/2025", "fintrack_bot").unwrap(),
            Command::Month("04/2025".to_string())
        );
        assert_eq!(Command::parse("/month", "fintrack_bot").unwrap(), Command::Month(String::new()));
        assert_eq!(
            Command::parse("/add_category@fintrack_bot", "fintrack_bot").unwrap(),
            Command::AddCategory
        );
    }

    #[test]
    fn test_help_lists_every_user_command() {
        for command in ["/add", "/report", "/prev_month", "/month", "/clear", "/categories"] {
            assert!(HELP_TEXT.contains(command));
        }
    }
}
