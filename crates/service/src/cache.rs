use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::dataset::DatasetReport;
use common::session::Address;
use parking_lot::Mutex;
use tokio::time::Instant;

/// An enriched snapshot held for one account
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub reports: Vec<DatasetReport>,
    /// Wall-clock time the snapshot was fetched, for display
    pub fetched_at: DateTime<Utc>,
    expires_at: Instant,
}

impl CachedSnapshot {
    pub fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Per-account memoization of enrichment results
///
/// Entries expire after the configured TTL and can be dropped
/// eagerly via `invalidate`. The pipelines never see this; callers
/// consult the cache first and fill it after a run.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    inner: Arc<Mutex<HashMap<Address, CachedSnapshot>>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        SnapshotCache {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Get the snapshot for an account if it is still fresh
    pub fn get(&self, account: &Address) -> Option<CachedSnapshot> {
        let mut inner = self.inner.lock();
        match inner.get(account) {
            Some(snapshot) if snapshot.is_fresh() => Some(snapshot.clone()),
            Some(_) => {
                tracing::debug!("snapshot for {} expired", account);
                inner.remove(account);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, account: Address, reports: Vec<DatasetReport>) {
        let snapshot = CachedSnapshot {
            reports,
            fetched_at: Utc::now(),
            expires_at: Instant::now() + self.ttl,
        };
        self.inner.lock().insert(account, snapshot);
    }

    pub fn invalidate(&self, account: &Address) {
        self.inner.lock().remove(account);
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Address {
        Address::new("0xabc")
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_snapshot_hits() {
        let cache = SnapshotCache::new(Duration::from_secs(30));
        cache.put(account(), Vec::new());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(cache.get(&account()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_snapshot_misses() {
        let cache = SnapshotCache::new(Duration::from_secs(30));
        cache.put(account(), Vec::new());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.get(&account()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_drops_entry() {
        let cache = SnapshotCache::new(Duration::from_secs(30));
        cache.put(account(), Vec::new());

        cache.invalidate(&account());
        assert!(cache.get(&account()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_accounts_are_independent() {
        let cache = SnapshotCache::new(Duration::from_secs(30));
        let other = Address::new("0xdef");
        cache.put(account(), Vec::new());

        assert!(cache.get(&account()).is_some());
        assert!(cache.get(&other).is_none());
    }
}
