//! Expense dates and calendar month periods
//!
//! Dates are persisted as `MM/DD/YYYY` text, so a month is selected in SQL
//! with a `LIKE 'MM/%/YYYY'` pattern.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Russian month name for 1..=12, the number itself otherwise
pub fn month_name(month: u32) -> String {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .map(|name| name.to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Date of an expense as stored in the database (`MM/DD/YYYY`).
///
/// Rows written by older versions may hold anything; those keep their raw
/// text and simply never match a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDate(String);

impl ExpenseDate {
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date.format("%m/%d/%Y").to_string())
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(month, year)` when the text has three `/`-separated parts with a
    /// numeric month and year.
    pub fn month_year(&self) -> Option<(u32, i32)> {
        let mut parts = self.0.split('/');
        let (month, _day, year) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let month = month.trim().parse::<u32>().ok()?;
        let year = year.trim().parse::<i32>().ok()?;
        Some((month, year))
    }
}

impl fmt::Display for ExpenseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("expected MM/YYYY, got '{0}'")]
    Format(String),
    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),
}

/// One calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthPeriod {
    pub month: u32,
    pub year: i32,
}

impl MonthPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Self { month, year })
    }

    pub fn current(today: NaiveDate) -> Self {
        Self {
            month: today.month(),
            year: today.year(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month > 1 {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        } else {
            Self {
                month: 12,
                year: self.year - 1,
            }
        }
    }

    /// Parses the `/month` argument, e.g. `04/2025` or `4/2025`.
    pub fn parse(input: &str) -> Result<Self, PeriodError> {
        let format_err = || PeriodError::Format(input.to_string());

        let (month, year) = input.split_once('/').ok_or_else(format_err)?;
        if year.contains('/') {
            return Err(format_err());
        }
        let month = month.trim().parse::<u32>().map_err(|_| format_err())?;
        let year = year.trim().parse::<i32>().map_err(|_| format_err())?;

        Self::new(month, year)
    }

    /// SQL `LIKE` pattern matching every `MM/DD/YYYY` date of the month
    pub fn like_pattern(&self) -> String {
        format!("{:02}/%/{}", self.month, self.year)
    }

    /// Same match as `date LIKE like_pattern()`: zero-padded month prefix,
    /// year suffix, anything in between.
    pub fn contains(&self, date: &ExpenseDate) -> bool {
        let prefix = format!("{:02}/", self.month);
        let suffix = format!("/{}", self.year);
        let raw = date.as_str();
        raw.len() >= prefix.len() + suffix.len() && raw.starts_with(&prefix) && raw.ends_with(&suffix)
    }

    /// `Апрель 2025`
    pub fn display_name(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    /// `04/2025`
    pub fn numeric(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expense_date_format() {
        let d = ExpenseDate::from_naive(date(2025, 4, 7));
        assert_eq!(d.as_str(), "04/07/2025");
        assert_eq!(d.month_year(), Some((4, 2025)));
    }

    #[test]
    fn test_malformed_dates_have_no_month() {
        assert_eq!(ExpenseDate::from_raw("2025-04-07").month_year(), None);
        assert_eq!(ExpenseDate::from_raw("aa/07/2025").month_year(), None);
        assert_eq!(ExpenseDate::from_raw("04/07/2025/1").month_year(), None);
        assert_eq!(ExpenseDate::from_raw("").month_year(), None);
    }

    #[test]
    fn test_previous_wraps_year() {
        assert_eq!(
            MonthPeriod::current(date(2025, 1, 15)).previous(),
            MonthPeriod { month: 12, year: 2024 }
        );
        assert_eq!(
            MonthPeriod::current(date(2025, 7, 1)).previous(),
            MonthPeriod { month: 6, year: 2025 }
        );
    }

    #[test]
    fn test_parse_month_argument() {
        assert_eq!(MonthPeriod::parse("04/2025"), Ok(MonthPeriod { month: 4, year: 2025 }));
        assert_eq!(MonthPeriod::parse("4/2025"), Ok(MonthPeriod { month: 4, year: 2025 }));
        assert_eq!(MonthPeriod::parse("13/2025"), Err(PeriodError::MonthOutOfRange(13)));
        assert_eq!(MonthPeriod::parse("0/2025"), Err(PeriodError::MonthOutOfRange(0)));
        assert!(matches!(MonthPeriod::parse("04-2025"), Err(PeriodError::Format(_))));
        assert!(matches!(MonthPeriod::parse("04/2025/1"), Err(PeriodError::Format(_))));
        assert!(matches!(MonthPeriod::parse("april/2025"), Err(PeriodError::Format(_))));
    }

    #[test]
    fn test_like_pattern_and_contains() {
        let period = MonthPeriod { month: 4, year: 2025 };
        assert_eq!(period.like_pattern(), "04/%/2025");
        assert!(period.contains(&ExpenseDate::from_raw("04/30/2025")));
        assert!(!period.contains(&ExpenseDate::from_raw("04/30/2024")));
        assert!(!period.contains(&ExpenseDate::from_raw("garbage")));
        // Unpadded months never matched the LIKE filter either
        assert!(!period.contains(&ExpenseDate::from_raw("4/01/2025")));
        assert!(!period.contains(&ExpenseDate::from_raw("04/2025")));
    }

    #[test]
    fn test_names() {
        let period = MonthPeriod { month: 12, year: 2024 };
        assert_eq!(period.display_name(), "Декабрь 2024");
        assert_eq!(period.numeric(), "12/2024");
        assert_eq!(month_name(13), "13");
        assert_eq!(month_name(0), "0");
    }
}
