//! Persistence layer.
//!
//! Defines the [`StatsStore`] and [`ActivityStore`] traits the batch
//! orchestrator writes through, plus two implementations: SQLite-backed
//! ([`SqliteStore`]) and in-memory ([`MemoryStore`]). Store handles are
//! injected into each batch run explicitly; there is no process-wide
//! mutable state.

pub mod database;
mod memory;
pub mod queries;
pub mod schema;
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Activity, UserId, UserStats};

pub use database::{Database, DatabaseError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable per-user statistics.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Loads a user's stats, defaulting to the empty aggregate for a user
    /// with no history.
    async fn load(&self, user: &UserId) -> StoreResult<UserStats>;

    /// Persists a user's stats.
    async fn save(&self, user: &UserId, stats: &UserStats) -> StoreResult<()>;
}

/// Durable per-user activity log, newest first, bounded to
/// [`crate::domain::ACTIVITY_WINDOW`] entries.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Appends one record and prunes the log to the retention window.
    async fn append(&self, user: &UserId, activity: &Activity) -> StoreResult<()>;

    /// Returns the retained records, newest first.
    async fn recent(&self, user: &UserId) -> StoreResult<Vec<Activity>>;
}
