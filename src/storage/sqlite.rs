//! SQLite-backed store implementation.

use std::path::Path;

use async_trait::async_trait;

use super::database::Database;
use super::{queries, ActivityStore, StatsStore, StoreResult};
use crate::domain::{Activity, UserId, UserStats};

/// Durable store over a SQLite database.
///
/// Cheap to clone; all clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens (and migrates) a store at the given path.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            db: Database::open(path).await?,
        })
    }

    /// Opens an in-memory store for testing.
    pub async fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }

    /// Creates the user's rows if this identity has not been seen before.
    pub async fn ensure_user(&self, user: &UserId) -> StoreResult<()> {
        queries::stats::ensure_user(&self.db, user).await?;
        Ok(())
    }
}

#[async_trait]
impl StatsStore for SqliteStore {
    async fn load(&self, user: &UserId) -> StoreResult<UserStats> {
        Ok(queries::stats::load(&self.db, user)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, user: &UserId, stats: &UserStats) -> StoreResult<()> {
        queries::stats::save(&self.db, user, stats).await?;
        Ok(())
    }
}

#[async_trait]
impl ActivityStore for SqliteStore {
    async fn append(&self, user: &UserId, activity: &Activity) -> StoreResult<()> {
        queries::activities::append(&self.db, user, activity).await?;
        Ok(())
    }

    async fn recent(&self, user: &UserId) -> StoreResult<Vec<Activity>> {
        Ok(queries::activities::recent(&self.db, user).await?)
    }
}
