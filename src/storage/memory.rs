//! In-memory store implementation.
//!
//! Keeps stats and activities in mutex-guarded maps. Useful for tests and
//! for single-process deployments that accept losing history on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ActivityStore, StatsStore, StoreResult};
use crate::domain::{Activity, UserId, UserStats, ACTIVITY_WINDOW};

/// Volatile store backed by in-process maps.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    stats: Mutex<HashMap<UserId, UserStats>>,
    activities: Mutex<HashMap<UserId, Vec<Activity>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn load(&self, user: &UserId) -> StoreResult<UserStats> {
        let stats = self.inner.stats.lock().await;
        Ok(stats.get(user).cloned().unwrap_or_default())
    }

    async fn save(&self, user: &UserId, stats: &UserStats) -> StoreResult<()> {
        let mut map = self.inner.stats.lock().await;
        map.insert(user.clone(), stats.clone());
        Ok(())
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn append(&self, user: &UserId, activity: &Activity) -> StoreResult<()> {
        let mut map = self.inner.activities.lock().await;
        let log = map.entry(user.clone()).or_default();

        log.insert(0, activity.clone());
        log.truncate(ACTIVITY_WINDOW);

        Ok(())
    }

    async fn recent(&self, user: &UserId) -> StoreResult<Vec<Activity>> {
        let map = self.inner.activities.lock().await;
        Ok(map.get(user).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActivityKind;

    #[tokio::test]
    async fn load_defaults_for_unknown_user() {
        let store = MemoryStore::new();
        let stats = store.load(&UserId::from("nobody")).await.unwrap();
        assert_eq!(stats, UserStats::default());
    }

    #[tokio::test]
    async fn stats_round_trip() {
        let store = MemoryStore::new();
        let user = UserId::from("alice@example.com");

        let mut stats = UserStats::default();
        stats.record_scan();
        store.save(&user, &stats).await.unwrap();

        let loaded = store.load(&user).await.unwrap();
        assert_eq!(loaded.total_scanned, 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::new();
        let user = UserId::from("alice@example.com");

        let clone = store.clone();
        clone.append(&user, &Activity::info("shared")).await.unwrap();

        let log = store.recent(&user).await.unwrap();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn activities_are_newest_first_and_bounded() {
        let store = MemoryStore::new();
        let user = UserId::from("alice@example.com");

        for i in 0..60 {
            store
                .append(&user, &Activity::info(format!("activity {}", i)))
                .await
                .unwrap();
        }

        let log = store.recent(&user).await.unwrap();
        assert_eq!(log.len(), ACTIVITY_WINDOW);
        assert_eq!(log[0].message, "activity 59");
        assert_eq!(log[ACTIVITY_WINDOW - 1].message, "activity 10");
        assert_eq!(log[0].kind, ActivityKind::Info);
    }
}
