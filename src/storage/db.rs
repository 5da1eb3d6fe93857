use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;

use super::ExpenseStore;
use crate::core::config::{self, categories::SHARED_OWNER, DbSettings};
use crate::core::{AppError, AppResult};
use crate::domain::{Expense, ExpenseDate, MonthPeriod, NewExpense, DEFAULT_CATEGORIES};

pub type DbPool = PgPool;

const CREATE_EXPENSES: &str = "CREATE TABLE IF NOT EXISTS expenses (
        id SERIAL PRIMARY KEY,
        user_id BIGINT,
        amount REAL,
        category TEXT,
        date TEXT,
        username TEXT
    )";

const CREATE_CATEGORIES: &str = "CREATE TABLE IF NOT EXISTS categories (
        id SERIAL PRIMARY KEY,
        user_id BIGINT,
        category TEXT
    )";

/// Create a new PostgreSQL connection pool
///
/// The pool connects lazily on first use of each connection slot but the
/// first connection is opened eagerly, so an unreachable server fails here.
///
/// # Arguments
///
/// * `settings` - Connection settings (DB_HOST, DB_PORT, ...)
pub async fn create_pool(settings: &DbSettings) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(settings.connect_options())
        .await
}

/// Connects to PostgreSQL, retrying while the server is not reachable yet.
///
/// With `restart: always` the bot container frequently starts before the
/// database accepts connections.
pub async fn connect_with_retry(settings: &DbSettings) -> AppResult<DbPool> {
    let max_attempts = config::retry::DB_CONNECT_ATTEMPTS;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match create_pool(settings).await {
            Ok(pool) => {
                log::info!("Connected to {} (attempt {})", settings.masked_url(), attempt);
                return Ok(pool);
            }
            Err(e) if attempt < max_attempts && is_retryable(&e) => {
                log::warn!(
                    "Database not ready (attempt {}/{}): {}. Retrying in {}s...",
                    attempt,
                    max_attempts,
                    e,
                    config::retry::DB_CONNECT_DELAY_SECS
                );
                tokio::time::sleep(config::retry::db_connect_delay()).await;
            }
            Err(e) => {
                log::error!("Giving up on database after {} attempt(s): {}", attempt, e);
                return Err(AppError::Database(e));
            }
        }
    }
}

/// Connection-level failures are worth retrying, authentication and
/// configuration errors are not.
fn is_retryable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_) => true,
        // 57P03: cannot_connect_now (server starting up)
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("57P03"),
        _ => false,
    }
}

/// PostgreSQL-backed [`ExpenseStore`]
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// REAL columns come back as f32; widen through the shortest decimal form so
/// 12.3 stays 12.3 instead of 12.300000190734863.
fn widen_amount(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

fn expense_from_row(row: &PgRow) -> Result<Expense, sqlx::Error> {
    let amount: Option<f32> = row.try_get("amount")?;
    let category: Option<String> = row.try_get("category")?;
    let date: Option<String> = row.try_get("date")?;
    let username: Option<String> = row.try_get("username")?;

    Ok(Expense {
        amount: amount.map(widen_amount).unwrap_or_default(),
        category: category.unwrap_or_default(),
        date: ExpenseDate::from_raw(date.unwrap_or_default()),
        username: username.unwrap_or_default(),
    })
}

async fn seed_defaults(pool: &DbPool, owner: i64) -> Result<Vec<String>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    for category in DEFAULT_CATEGORIES {
        sqlx::query("INSERT INTO categories (user_id, category) VALUES ($1, $2)")
            .bind(owner)
            .bind(category)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect())
}

#[async_trait]
impl ExpenseStore for PgStore {
    async fn initialize(&self) -> AppResult<()> {
        sqlx::query(CREATE_EXPENSES).execute(&self.pool).await?;
        sqlx::query(CREATE_CATEGORIES).execute(&self.pool).await?;
        log::info!("Database schema is ready");
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn user_categories(&self, user_id: i64) -> AppResult<Vec<String>> {
        let rows: Vec<Option<String>> =
            sqlx::query_scalar("SELECT category FROM categories WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        if rows.is_empty() {
            log::info!("Seeding default categories for user {}", user_id);
            return Ok(seed_defaults(&self.pool, user_id).await?);
        }

        Ok(rows.into_iter().flatten().collect())
    }

    async fn insert_expense(&self, expense: &NewExpense) -> AppResult<()> {
        sqlx::query("INSERT INTO expenses (user_id, amount, category, date, username) VALUES ($1, $2, $3, $4, $5)")
            .bind(expense.user_id)
            .bind(expense.amount as f32)
            .bind(&expense.category)
            .bind(expense.date.as_str())
            .bind(&expense.username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn expenses(&self) -> AppResult<Vec<Expense>> {
        let rows = sqlx::query("SELECT amount, category, date, username FROM expenses ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(expense_from_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn monthly_expenses(&self, period: MonthPeriod) -> AppResult<Vec<Expense>> {
        let rows = sqlx::query("SELECT amount, category, date, username FROM expenses WHERE date LIKE $1 ORDER BY id")
            .bind(period.like_pattern())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(expense_from_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn clear_all_expenses(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM expenses").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn categories(&self) -> AppResult<Vec<String>> {
        let rows: Vec<Option<String>> =
            sqlx::query_scalar("SELECT category FROM categories GROUP BY category ORDER BY MIN(id)")
                .fetch_all(&self.pool)
                .await?;

        if rows.is_empty() {
            log::info!("Category table is empty, seeding shared defaults");
            return Ok(seed_defaults(&self.pool, SHARED_OWNER).await?);
        }

        Ok(rows.into_iter().flatten().collect())
    }

    async fn insert_category(&self, user_id: i64, category: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO categories (user_id, category) VALUES ($1, $2)")
            .bind(user_id)
            .bind(category)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_category(&self, category: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM categories WHERE category = $1")
            .bind(category)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
