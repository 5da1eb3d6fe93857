use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Me;
use tokio::time::sleep;

use fintrack::cli::{Cli, Commands};
use fintrack::core::config::{self, DbSettings};
use fintrack::core::http_server::start_http_server;
use fintrack::core::{init_logger, log_database_configuration, metrics};
use fintrack::storage::{connect_with_retry, ExpenseStore, PgStore};
use fintrack::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics from handler tasks instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // .env must be loaded before any config static is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) => run_bot().await,
        Some(Commands::InitDb) => run_init_db().await,
        Some(Commands::CheckConfig) => run_check_config(),
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    metrics::init_metrics();

    let settings = DbSettings::from_env()?;
    log_database_configuration(&settings);

    let bot = create_bot()?;

    let pool = connect_with_retry(&settings).await?;
    let store: Arc<dyn ExpenseStore> = Arc::new(PgStore::new(pool));
    store.initialize().await?;
    log::info!("✅ Database schema is ready");

    if *config::http::ENABLED {
        let http_store = Arc::clone(&store);
        let port = *config::http::PORT;
        tokio::spawn(async move {
            if let Err(e) = start_http_server(port, http_store).await {
                log::error!("Health server stopped: {}", e);
            }
        });
    } else {
        log::info!("Health server disabled (HTTP_ENABLED=false)");
    }

    let me = wait_for_bot_api(&bot).await?;
    log::info!("Bot username: {:?}, Bot ID: {}", me.username.as_deref(), me.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let handler = schema(HandlerDeps::new(store));

    let mut retry_count = 0;
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

    // Run the dispatcher with retry logic
    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // A separate task so that a panic surfaces through the JoinHandle
        let handle = tokio::spawn(async move {
            use teloxide::update_listeners::Polling;

            // Updates sent while the bot was down are dropped on start
            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(DependencyMap::new())
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);
                if retry_count >= max_retries {
                    log::error!("Max retries reached after panic. Exiting...");
                    break;
                }
                retry_count += 1;
                log::info!(
                    "Retrying dispatcher after panic (attempt {}/{})...",
                    retry_count,
                    max_retries
                );
                sleep(config::retry::dispatcher_backoff(retry_count)).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }
    }

    Ok(())
}

/// Calls get_me until the Bot API answers; network failures are retried.
async fn wait_for_bot_api(bot: &Bot) -> Result<Me> {
    let max_attempts = config::retry::BOT_API_ATTEMPTS;
    let mut attempt = 0;
    loop {
        match bot.get_me().await {
            Ok(me) => return Ok(me),
            Err(e) => {
                attempt += 1;
                let retryable = matches!(e, teloxide::RequestError::Network(_) | teloxide::RequestError::Io(_))
                    || e.to_string().contains("restart");
                if attempt >= max_attempts || !retryable {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to Bot API after {} attempts: {}",
                        attempt,
                        e
                    ));
                }
                log::warn!(
                    "Bot API not ready (attempt {}/{}): {}. Retrying in {}s...",
                    attempt,
                    max_attempts,
                    e,
                    config::retry::BOT_API_DELAY_SECS
                );
                sleep(config::retry::bot_api_delay()).await;
            }
        }
    }
}

async fn run_init_db() -> Result<()> {
    let settings = DbSettings::from_env()?;
    log_database_configuration(&settings);

    let pool = connect_with_retry(&settings).await?;
    PgStore::new(pool).initialize().await?;
    log::info!("✅ Tables created (or already present) in {}", settings.masked_url());
    Ok(())
}

fn run_check_config() -> Result<()> {
    let settings = DbSettings::from_env()?;
    let token = if config::BOT_TOKEN.is_empty() {
        "<not set>".to_string()
    } else {
        config::mask_token(&config::BOT_TOKEN)
    };

    println!("BOT_TOKEN:        {}", token);
    println!("Database:         {}", settings.masked_url());
    println!("DB pool size:     {}", settings.max_connections);
    println!("HTTP server:      {} (port {})", *config::http::ENABLED, *config::http::PORT);
    println!("Log file:         {}", *config::LOG_FILE_PATH);

    if config::BOT_TOKEN.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN is not set"));
    }
    Ok(())
}
