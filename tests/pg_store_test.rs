//! PostgreSQL store against a live server
//!
//! These tests need a reachable database and are ignored by default.
//! Run with: DB_HOST=localhost cargo test --test pg_store_test -- --ignored
//!
//! Every test tags its rows with a unique username or user id and removes
//! them afterwards, so a database that already holds real data is safe.

use std::time::{SystemTime, UNIX_EPOCH};

use fintrack::config::DbSettings;
use fintrack::domain::{ExpenseDate, MonthPeriod, NewExpense, DEFAULT_CATEGORIES};
use fintrack::storage::connect_with_retry;
use fintrack::{ExpenseStore, PgStore};
use pretty_assertions::assert_eq;
use serial_test::serial;

/// Connects and creates the tables; `None` when DB_HOST is not set.
async fn live_store() -> Option<PgStore> {
    if std::env::var("DB_HOST").is_err() {
        eprintln!("DB_HOST is not set, skipping");
        return None;
    }
    let settings = DbSettings::from_env().expect("database settings are valid");
    let pool = connect_with_retry(&settings).await.expect("database is reachable");
    let store = PgStore::new(pool);
    store.initialize().await.expect("tables are created");
    Some(store)
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}_{}", std::process::id(), nanos)
}

/// A user id far below anything Telegram hands out
fn unique_user_id() -> i64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    -1_000_000_000_000 - i64::from(nanos)
}

fn expense(username: &str, amount: f64, category: &str, date: &str) -> NewExpense {
    NewExpense {
        user_id: 1,
        amount,
        category: category.to_string(),
        date: ExpenseDate::from_raw(date),
        username: username.to_string(),
    }
}

async fn remove_expenses_of(store: &PgStore, username: &str) {
    sqlx::query("DELETE FROM expenses WHERE username = $1")
        .bind(username)
        .execute(store.pool())
        .await
        .expect("cleanup succeeds");
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_expenses_are_listed_newest_first() {
    let Some(store) = live_store().await else {
        return;
    };
    let username = format!("order_{}", unique_suffix());

    for (amount, category) in [(1.0, "first"), (2.0, "second"), (3.0, "third")] {
        store
            .insert_expense(&expense(&username, amount, category, "03/10/2025"))
            .await
            .unwrap();
    }

    let ours: Vec<String> = store
        .expenses()
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.username == username)
        .map(|e| e.category)
        .collect();
    assert_eq!(ours, vec!["third", "second", "first"]);

    remove_expenses_of(&store, &username).await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_month_filter_matches_padded_dates_oldest_first() {
    let Some(store) = live_store().await else {
        return;
    };
    let username = format!("month_{}", unique_suffix());

    for (category, date) in [
        ("early", "04/01/1999"),
        ("unpadded", "4/02/1999"),
        ("other_month", "05/03/1999"),
        ("late", "04/28/1999"),
    ] {
        store
            .insert_expense(&expense(&username, 10.0, category, date))
            .await
            .unwrap();
    }

    let april = MonthPeriod::new(4, 1999).unwrap();
    let ours: Vec<String> = store
        .monthly_expenses(april)
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.username == username)
        .map(|e| e.category)
        .collect();
    assert_eq!(ours, vec!["early", "late"]);

    // The in-memory store filters with `contains`; it must agree with LIKE
    assert!(april.contains(&ExpenseDate::from_raw("04/01/1999")));
    assert!(april.contains(&ExpenseDate::from_raw("04/28/1999")));
    assert!(!april.contains(&ExpenseDate::from_raw("4/02/1999")));

    remove_expenses_of(&store, &username).await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_real_column_amounts_read_back_as_entered() {
    let Some(store) = live_store().await else {
        return;
    };
    let username = format!("amount_{}", unique_suffix());

    for amount in [12.3, 0.1, 250.0] {
        store
            .insert_expense(&expense(&username, amount, "Еда", "06/15/2025"))
            .await
            .unwrap();
    }

    let mut amounts: Vec<f64> = store
        .expenses()
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.username == username)
        .map(|e| e.amount)
        .collect();
    amounts.reverse();
    assert_eq!(amounts, vec![12.3, 0.1, 250.0]);

    remove_expenses_of(&store, &username).await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_categories_are_distinct_and_deleted_for_every_owner() {
    let Some(store) = live_store().await else {
        return;
    };
    let name = format!("cat_{}", unique_suffix());
    let (first_owner, second_owner) = (unique_user_id(), unique_user_id() - 1);

    store.insert_category(first_owner, &name).await.unwrap();
    store.insert_category(second_owner, &name).await.unwrap();

    let listed = store.categories().await.unwrap();
    assert_eq!(listed.iter().filter(|c| **c == name).count(), 1);

    assert_eq!(store.delete_category(&name).await.unwrap(), 2);
    assert!(!store.categories().await.unwrap().contains(&name));
    assert_eq!(store.delete_category(&name).await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_user_categories_seed_defaults_once() {
    let Some(store) = live_store().await else {
        return;
    };
    let user_id = unique_user_id();
    let defaults: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();

    assert_eq!(store.user_categories(user_id).await.unwrap(), defaults);
    assert_eq!(store.user_categories(user_id).await.unwrap(), defaults);

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(stored, DEFAULT_CATEGORIES.len() as i64);

    sqlx::query("DELETE FROM categories WHERE user_id = $1")
        .bind(user_id)
        .execute(store.pool())
        .await
        .unwrap();
}
