//! Testing utilities
//!
//! [`MemoryStore`] implements [`crate::storage::ExpenseStore`] entirely in
//! memory, so the real dispatcher schema can be exercised without PostgreSQL.
//!
//! ```rust
//! use std::sync::Arc;
//! use fintrack::testing::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! ```

pub mod memory_store;

pub use memory_store::{CategoryRow, ExpenseRow, MemoryStore};
