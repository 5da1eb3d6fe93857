use thiserror::Error;

/// Centralized error types for the application
///
/// Storage, Telegram and configuration failures are converted to this enum so
/// handlers can decide in one place what the user gets to see.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// True for failures of the storage layer
    pub fn is_storage(&self) -> bool {
        matches!(self, AppError::Database(_))
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
