//! Report rendering against a store, end to end without Telegram

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use fintrack::config::report::MAX_CHUNK_CHARS;
use fintrack::domain::{ExpenseDate, MonthPeriod, NewExpense};
use fintrack::reports::{month_report, overview_report, MonthReportKind};
use fintrack::storage::ExpenseStore;
use fintrack::testing::MemoryStore;

fn new_expense(amount: f64, category: &str, date: &str, username: &str) -> NewExpense {
    NewExpense {
        user_id: 7,
        amount,
        category: category.to_string(),
        date: ExpenseDate::from_raw(date),
        username: username.to_string(),
    }
}

#[tokio::test]
async fn test_long_month_is_split_into_chunks() {
    let store = MemoryStore::new();
    for day in 0..200 {
        let date = format!("04/{:02}/2025", day % 28 + 1);
        store
            .insert_expense(&new_expense(10.0 + day as f64, "Развлечения", &date, "anna"))
            .await
            .unwrap();
    }

    let period = MonthPeriod::parse("04/2025").unwrap();
    let expenses = store.monthly_expenses(period).await.unwrap();
    let messages = month_report(&expenses, period, MonthReportKind::Requested);

    assert!(messages.len() > 2, "expected several chunks, got {}", messages.len());
    assert!(messages[0].starts_with("Отчет за Апрель 2025:\n\n"));
    for chunk in &messages[1..messages.len() - 1] {
        assert!(chunk.starts_with("Отчет за Апрель 2025 (продолжение):\n\n"));
    }
    for message in &messages {
        assert!(message.chars().count() <= MAX_CHUNK_CHARS);
    }

    let listed: usize = messages.iter().map(|m| m.matches("(добавил: @anna)").count()).sum();
    assert_eq!(listed, 200);

    let summary = messages.last().unwrap();
    // 200 * 10 + (0 + 1 + ... + 199)
    assert!(summary.contains("💰 Всего за месяц: 21900.00$"));
    assert!(summary.contains("• Развлечения: 21900.00$"));
}

#[tokio::test]
async fn test_overview_uses_newest_first_order() {
    let store = MemoryStore::new();
    store.insert_expense(&new_expense(1.0, "Еда", "04/01/2025", "anna")).await.unwrap();
    store.insert_expense(&new_expense(2.0, "Еда", "04/02/2025", "boris")).await.unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
    let messages = overview_report(&store.expenses().await.unwrap(), today);

    assert_eq!(
        messages[0],
        "Ваши расходы:\n\n== Апрель 2025 ==\n\
         04/02/2025: 2.0$ — Еда (добавил: @boris)\n\
         04/01/2025: 1.0$ — Еда (добавил: @anna)\n"
    );
}
