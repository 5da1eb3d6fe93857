//! Parsing and display of money amounts

use thiserror::Error;

/// Why a typed amount was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("amount must be a finite number")]
    NotFinite,
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount does not fit the REAL column")]
    TooLarge,
}

/// Parses an amount typed by a user.
///
/// Surrounding whitespace is ignored and a decimal comma is accepted
/// (`12,50`). The result is finite and strictly positive, and stays finite
/// when narrowed to the `f32` the database column holds.
pub fn parse_amount(input: &str) -> Result<f64, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replacen(',', ".", 1)
    } else {
        trimmed.to_string()
    };

    let value: f64 = normalized
        .parse()
        .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(AmountError::NotFinite);
    }
    if value <= 0.0 {
        return Err(AmountError::NotPositive);
    }
    if value > f64::from(f32::MAX) {
        return Err(AmountError::TooLarge);
    }

    Ok(value)
}

/// Default float display: shortest round-trip digits, always with a
/// fractional part (`12.0`, `12.5`, `0.1`).
pub fn format_amount_plain(amount: f64) -> String {
    let text = amount.to_string();
    if amount.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Two-decimal display used in totals (`12.50`).
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
