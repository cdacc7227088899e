//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod regeneration;

pub use regeneration::{InMemoryRegenerationStore, PgRegenerationStore, RegenerationStore};
