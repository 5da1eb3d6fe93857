//! Report rendering
//!
//! Everything here is pure: handlers fetch rows from the store, pass them in
//! together with "today", and send the returned messages in order. Long
//! listings are split so that no message exceeds
//! [`crate::config::report::MAX_CHUNK_CHARS`] characters.

mod chunk;

use chrono::NaiveDate;

use crate::config::report::MAX_CHUNK_CHARS;
use crate::domain::{format_amount, format_amount_plain, Expense, MonthPeriod};

pub use chunk::chunk_lines;

pub const NO_RECORDS: &str = "Пока нет записей. Попробуй добавить расходы!";

/// Which month command a report answers; they differ only in wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthReportKind {
    /// `/month MM/YYYY`
    Requested,
    /// `/prev_month`
    Previous,
}

impl MonthReportKind {
    fn header(self, period: &MonthPeriod) -> String {
        match self {
            MonthReportKind::Requested => format!("Отчет за {}:\n\n", period.display_name()),
            MonthReportKind::Previous => format!("📅 Подробный отчет за {}:\n\n", period.display_name()),
        }
    }

    fn continuation(self, period: &MonthPeriod) -> String {
        match self {
            MonthReportKind::Requested => format!("Отчет за {} (продолжение):\n\n", period.display_name()),
            MonthReportKind::Previous => format!("📅 {} (продолжение):\n\n", period.display_name()),
        }
    }

    fn total_label(self, period: &MonthPeriod) -> String {
        match self {
            MonthReportKind::Requested => "Всего за месяц".to_string(),
            MonthReportKind::Previous => format!("Всего за {}", period.display_name()),
        }
    }

    fn empty_message(self, period: &MonthPeriod) -> String {
        match self {
            MonthReportKind::Requested => format!("За {} расходов не найдено.", period.numeric()),
            MonthReportKind::Previous => format!("За {} расходов не найдено.", period.display_name()),
        }
    }
}

/// One listing line; `amount` is pre-formatted by the caller.
fn expense_line(expense: &Expense, amount: &str) -> String {
    format!(
        "{}: {}$ — {} (добавил: @{})\n",
        expense.date, amount, expense.category, expense.username
    )
}

/// `/report`: this month's expenses plus totals for the previous month,
/// this month and this year.
///
/// `expenses` is expected newest first; rows whose date cannot be read are
/// left out of every total.
pub fn overview_report(expenses: &[Expense], today: NaiveDate) -> Vec<String> {
    if expenses.is_empty() {
        return vec![NO_RECORDS.to_string()];
    }

    let current = MonthPeriod::current(today);
    let previous = current.previous();

    let mut current_total = 0.0;
    let mut previous_total = 0.0;
    let mut year_total = 0.0;
    let mut current_lines = Vec::new();

    for expense in expenses {
        let Some((month, year)) = expense.date.month_year() else {
            continue;
        };
        if month == current.month && year == current.year {
            current_total += expense.amount;
            current_lines.push(expense_line(expense, &format_amount_plain(expense.amount)));
        }
        if month == previous.month && year == previous.year {
            previous_total += expense.amount;
        }
        if year == current.year {
            year_total += expense.amount;
        }
    }

    let mut messages = if current_lines.is_empty() {
        vec![format!(
            "Ваши расходы:\n\nЗа {} расходов не найдено.",
            current.display_name()
        )]
    } else {
        chunk_lines(
            &format!("Ваши расходы:\n\n== {} ==\n", current.display_name()),
            &format!("== {} (продолжение) ==\n", current.display_name()),
            &current_lines,
            MAX_CHUNK_CHARS,
        )
    };

    messages.push(format!(
        "📊 ИТОГИ:\n\n💰 Расходы за {}: {}$\n💰 Расходы за {}: {}$\n💰 Общие расходы за {} год: {}$",
        previous.display_name(),
        format_amount(previous_total),
        current.display_name(),
        format_amount(current_total),
        current.year,
        format_amount(year_total),
    ));

    messages
}

/// Sums amounts per key, keeping keys in first-seen order.
fn grouped_totals<'a>(expenses: &'a [Expense], key: impl Fn(&'a Expense) -> &'a str) -> Vec<(&'a str, f64)> {
    let mut totals: Vec<(&str, f64)> = Vec::new();
    for expense in expenses {
        let k = key(expense);
        match totals.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, sum)) => *sum += expense.amount,
            None => totals.push((k, expense.amount)),
        }
    }
    totals
}

/// `/month` and `/prev_month`: every expense of `period` followed by totals
/// per category and per user.
pub fn month_report(expenses: &[Expense], period: MonthPeriod, kind: MonthReportKind) -> Vec<String> {
    if expenses.is_empty() {
        return vec![kind.empty_message(&period)];
    }

    let lines: Vec<String> = expenses
        .iter()
        .map(|e| expense_line(e, &format_amount(e.amount)))
        .collect();

    let mut messages = chunk_lines(&kind.header(&period), &kind.continuation(&period), &lines, MAX_CHUNK_CHARS);

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let mut summary = format!("\n💰 {}: {}$\n\n", kind.total_label(&period), format_amount(total));

    summary.push_str("📊 Расходы по категориям:\n");
    for (category, sum) in grouped_totals(expenses, |e| e.category.as_str()) {
        summary.push_str(&format!("• {}: {}$\n", category, format_amount(sum)));
    }

    summary.push_str("\n👥 Расходы по пользователям:\n");
    for (user, sum) in grouped_totals(expenses, |e| e.username.as_str()) {
        summary.push_str(&format!("• @{}: {}$\n", user, format_amount(sum)));
    }

    messages.push(summary);
    messages
}

/// `/categories`
pub fn category_list(categories: &[String]) -> String {
    let mut text = String::from("Все доступные категории:\n\n");
    for (i, category) in categories.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, category));
    }
    text.push_str("\nИспользуйте /add_category для добавления или /delete_category для удаления категории.");
    text
}
