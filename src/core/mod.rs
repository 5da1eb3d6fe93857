//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod http_server;
pub mod logging;
pub mod metrics;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_database_configuration};
