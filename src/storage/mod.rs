//! Expense and category persistence
//!
//! Handlers only see the [`ExpenseStore`] trait; production wires in
//! [`PgStore`], tests use [`crate::testing::MemoryStore`].

pub mod db;

use async_trait::async_trait;

use crate::core::AppResult;
use crate::domain::{Expense, MonthPeriod, NewExpense};

// Re-exports for convenience
pub use db::{connect_with_retry, create_pool, DbPool, PgStore};

/// Storage operations the bot needs.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Creates the `expenses` and `categories` tables if they are missing.
    async fn initialize(&self) -> AppResult<()>;

    /// Cheap connectivity check used by `/ready`.
    async fn ping(&self) -> AppResult<()>;

    /// Categories owned by `user_id`. A user without any gets the defaults
    /// inserted under their id.
    async fn user_categories(&self, user_id: i64) -> AppResult<Vec<String>>;

    async fn insert_expense(&self, expense: &NewExpense) -> AppResult<()>;

    /// Every expense, newest first.
    async fn expenses(&self) -> AppResult<Vec<Expense>>;

    /// Expenses dated within `period`, oldest first.
    async fn monthly_expenses(&self, period: MonthPeriod) -> AppResult<Vec<Expense>>;

    /// Deletes every expense of every user; returns the number removed.
    async fn clear_all_expenses(&self) -> AppResult<u64>;

    /// Distinct category names across all owners, in first-insert order.
    /// An empty table is seeded with the defaults under the shared owner.
    async fn categories(&self) -> AppResult<Vec<String>>;

    async fn insert_category(&self, user_id: i64, category: &str) -> AppResult<()>;

    /// Deletes `category` for every owner; returns the number of rows removed.
    async fn delete_category(&self, category: &str) -> AppResult<u64>;
}
