//! FinTrack - Telegram bot for tracking shared expenses
//!
//! The bot records expenses through a short conversation (amount, then a
//! category picked from an inline keyboard), stores them in PostgreSQL and
//! renders monthly reports back into the chat.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, metrics and the health server
//! - `domain`: expenses, categories, dates and month periods
//! - `storage`: the `ExpenseStore` trait and its PostgreSQL implementation
//! - `reports`: pure text rendering of reports and category lists
//! - `telegram`: commands, conversation state and the dispatcher schema
//! - `testing`: in-memory store used by tests and local dry runs

pub mod cli;
pub mod core;
pub mod domain;
pub mod reports;
pub mod storage;
pub mod telegram;
pub mod testing;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use storage::{ExpenseStore, PgStore};
pub use telegram::{schema, HandlerDeps, HandlerError};
