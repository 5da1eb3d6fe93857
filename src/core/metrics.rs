//! Prometheus metrics for the bot
//!
//! Registration only fails on duplicate metric names, which is a programming
//! error caught on first access.
#![allow(clippy::expect_used)]

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_int_counter, register_int_counter_vec};
use prometheus::{CounterVec, IntCounter, IntCounterVec};

/// Commands handled, by command name
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("fintrack_commands_total", "Total number of bot commands handled", &["command"])
        .expect("register fintrack_commands_total")
});

/// Expenses recorded, by category
pub static EXPENSES_RECORDED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fintrack_expenses_recorded_total",
        "Total number of expenses recorded",
        &["category"]
    )
    .expect("register fintrack_expenses_recorded_total")
});

/// Sum of recorded amounts, by category
pub static EXPENSE_AMOUNT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fintrack_expense_amount_total",
        "Sum of recorded expense amounts",
        &["category"]
    )
    .expect("register fintrack_expense_amount_total")
});

/// Storage failures surfaced to handlers
pub static STORAGE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("fintrack_storage_errors_total", "Total number of storage errors seen by handlers")
        .expect("register fintrack_storage_errors_total")
});

/// Rejected user input (bad amounts, bad month arguments, empty category names)
pub static INVALID_INPUT_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("fintrack_invalid_input_total", "Total number of rejected user inputs", &["kind"])
        .expect("register fintrack_invalid_input_total")
});

/// Forces registration so every series shows up on /metrics before first use.
pub fn init_metrics() {
    Lazy::force(&COMMANDS_TOTAL);
    Lazy::force(&EXPENSES_RECORDED_TOTAL);
    Lazy::force(&EXPENSE_AMOUNT_TOTAL);
    Lazy::force(&STORAGE_ERRORS_TOTAL);
    Lazy::force(&INVALID_INPUT_TOTAL);
}

pub fn record_command(command: &str) {
    COMMANDS_TOTAL.with_label_values(&[command]).inc();
}

pub fn record_expense(category: &str, amount: f64) {
    EXPENSES_RECORDED_TOTAL.with_label_values(&[category]).inc();
    EXPENSE_AMOUNT_TOTAL.with_label_values(&[category]).inc_by(amount);
}

pub fn record_invalid_input(kind: &str) {
    INVALID_INPUT_TOTAL.with_label_values(&[kind]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_expense_updates_both_series() {
        init_metrics();
        let before = EXPENSES_RECORDED_TOTAL.with_label_values(&["metrics-test"]).get();
        record_expense("metrics-test", 12.5);
        assert_eq!(EXPENSES_RECORDED_TOTAL.with_label_values(&["metrics-test"]).get(), before + 1);
        assert!(EXPENSE_AMOUNT_TOTAL.with_label_values(&["metrics-test"]).get() >= 12.5);
    }

    #[test]
    fn test_metrics_are_gathered() {
        init_metrics();
        record_command("help");
        let text = prometheus::TextEncoder::new()
            .encode_to_string(&prometheus::gather())
            .unwrap();
        assert!(text.contains("fintrack_commands_total"));
    }
}
