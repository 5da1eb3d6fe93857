//! Domain types: expenses, categories, dates, month periods and amounts

pub mod amount;
pub mod expense;
pub mod period;

pub use amount::{format_amount, format_amount_plain, parse_amount, AmountError};
pub use expense::{Expense, NewExpense, DEFAULT_CATEGORIES};
pub use period::{month_name, ExpenseDate, MonthPeriod, PeriodError};
