//! In-memory [`ExpenseStore`] with the same ordering and seeding rules as
//! the PostgreSQL store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::core::config::categories::SHARED_OWNER;
use crate::core::{AppError, AppResult};
use crate::domain::{Expense, MonthPeriod, NewExpense, DEFAULT_CATEGORIES};
use crate::storage::ExpenseStore;

/// A stored expense with its insertion id
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub id: u64,
    pub user_id: i64,
    pub expense: Expense,
}

/// A stored category with its insertion id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: u64,
    pub user_id: i64,
    pub category: String,
}

#[derive(Default)]
struct Tables {
    next_id: u64,
    expenses: Vec<ExpenseRow>,
    categories: Vec<CategoryRow>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn push_category(&mut self, user_id: i64, category: &str) {
        let id = self.next_id();
        self.categories.push(CategoryRow {
            id,
            user_id,
            category: category.to_string(),
        });
    }

    fn seed_defaults(&mut self, owner: i64) -> Vec<String> {
        for category in DEFAULT_CATEGORIES {
            self.push_category(owner, category);
        }
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }
}

/// In-memory expense store
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Stored expenses in insertion order
    pub fn expense_rows(&self) -> Vec<ExpenseRow> {
        self.lock().map(|t| t.expenses.clone()).unwrap_or_default()
    }

    /// Stored categories in insertion order
    pub fn category_rows(&self) -> Vec<CategoryRow> {
        self.lock().map(|t| t.categories.clone()).unwrap_or_default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Tables>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.tables
            .lock()
            .map_err(|_| AppError::Validation("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn initialize(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }

    async fn ping(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }

    async fn user_categories(&self, user_id: i64) -> AppResult<Vec<String>> {
        let mut tables = self.lock()?;
        let owned: Vec<String> = tables
            .categories
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.category.clone())
            .collect();

        if owned.is_empty() {
            return Ok(tables.seed_defaults(user_id));
        }
        Ok(owned)
    }

    async fn insert_expense(&self, expense: &NewExpense) -> AppResult<()> {
        let mut tables = self.lock()?;
        let id = tables.next_id();
        tables.expenses.push(ExpenseRow {
            id,
            user_id: expense.user_id,
            expense: expense.clone().into_expense(),
        });
        Ok(())
    }

    async fn expenses(&self) -> AppResult<Vec<Expense>> {
        let tables = self.lock()?;
        Ok(tables.expenses.iter().rev().map(|row| row.expense.clone()).collect())
    }

    async fn monthly_expenses(&self, period: MonthPeriod) -> AppResult<Vec<Expense>> {
        let tables = self.lock()?;
        Ok(tables
            .expenses
            .iter()
            .filter(|row| period.contains(&row.expense.date))
            .map(|row| row.expense.clone())
            .collect())
    }

    async fn clear_all_expenses(&self) -> AppResult<u64> {
        let mut tables = self.lock()?;
        let removed = tables.expenses.len() as u64;
        tables.expenses.clear();
        Ok(removed)
    }

    async fn categories(&self) -> AppResult<Vec<String>> {
        let mut tables = self.lock()?;
        if tables.categories.is_empty() {
            return Ok(tables.seed_defaults(SHARED_OWNER));
        }

        let mut distinct: Vec<String> = Vec::new();
        for row in &tables.categories {
            if !distinct.contains(&row.category) {
                distinct.push(row.category.clone());
            }
        }
        Ok(distinct)
    }

    async fn insert_category(&self, user_id: i64, category: &str) -> AppResult<()> {
        self.lock()?.push_category(user_id, category);
        Ok(())
    }

    async fn delete_category(&self, category: &str) -> AppResult<u64> {
        let mut tables = self.lock()?;
        let before = tables.categories.len();
        tables.categories.retain(|row| row.category != category);
        Ok((before - tables.categories.len()) as u64)
    }
}
