//! Query-keyed result cache for the fetch layer, backed by moka.
//!
//! Entries are replaced wholesale and considered fresh for a fixed staleness
//! window. A stale entry is kept until it is refreshed or evicted, so a failed
//! refetch still leaves the last good result in place. Eviction is bounded by
//! a retention TTL and a capacity limit. Invalidation is per key; there is
//! no flush-all.

use std::future::Future;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tracing::{debug, warn};

use crate::domain::errors::{DashboardError, DashboardResult};

/// Default freshness window in seconds.
pub const DEFAULT_STALE_AFTER_SECS: i64 = 30;

/// Stale entries are retained for this many staleness windows before eviction.
pub const RETENTION_FACTOR: u32 = 10;

/// Floor for the retention TTL derived from the staleness window.
const MIN_RETENTION: StdDuration = StdDuration::from_secs(1);

/// Maximum number of entries held per cache.
pub const DEFAULT_MAX_CAPACITY: u64 = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub fetched_at: DateTime<Utc>,
}

pub struct QueryCache<V> {
    entries: Cache<String, CacheEntry<V>>,
    stale_after: Duration,
}

impl<V> Default for QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_STALE_AFTER_SECS))
    }
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create with the default retention and capacity.
    pub fn new(stale_after: Duration) -> Self {
        let window = stale_after.to_std().unwrap_or(StdDuration::ZERO);
        Self::with_limits(
            stale_after,
            window.saturating_mul(RETENTION_FACTOR).max(MIN_RETENTION),
            DEFAULT_MAX_CAPACITY,
        )
    }

    /// Create with an explicit retention TTL and capacity.
    pub fn with_limits(stale_after: Duration, retain_for: StdDuration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(retain_for)
            .build();

        Self {
            entries,
            stale_after,
        }
    }

    pub const fn stale_after(&self) -> Duration {
        self.stale_after
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.fetched_at < self.stale_after
    }

    /// Cached entry for `key`, fresh or not.
    pub async fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.get(key).await
    }

    /// Replace the entry for `key`.
    pub async fn set(&self, key: impl Into<String>, value: V, fetched_at: DateTime<Utc>) {
        self.entries
            .insert(key.into(), CacheEntry { value, fetched_at })
            .await;
    }

    /// A missing key is stale. An entry is fresh while `now - fetched_at` is
    /// below the staleness window.
    pub async fn is_stale(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.get(key)
            .await
            .map_or(true, |entry| !self.is_fresh(&entry, now))
    }

    /// Drop the stored entries for `keys`. A request already in flight is
    /// left to finish. Returns how many entries were removed.
    pub async fn invalidate<I, S>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = 0;
        for key in keys {
            let key = key.as_ref();
            if self.entries.remove(key).await.is_some() {
                removed += 1;
            }
            debug!(key, "query cache key invalidated");
        }
        removed
    }

    /// Entry count after pending evictions have been applied.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Serve `key` from cache while fresh; otherwise run `fetch`.
    ///
    /// Refreshes of one key are serialized, so at most one request per key
    /// is in flight. Callers that queued behind it are answered from the
    /// entry it stored. A failed fetch leaves the previous entry in place.
    pub async fn get_or_fetch<F>(&self, key: &str, fetch: F) -> DashboardResult<V>
    where
        F: Future<Output = DashboardResult<V>> + Send + 'static,
    {
        if let Some(entry) = self.get(key).await {
            if self.is_fresh(&entry, Utc::now()) {
                debug!(key, "query cache hit");
                return Ok(entry.value);
            }
        }

        let stale_after = self.stale_after;
        let result = self
            .entries
            .entry_by_ref(key)
            .and_try_compute_with(|current| async move {
                if let Some(entry) = current {
                    if Utc::now() - entry.value().fetched_at < stale_after {
                        debug!(key, "served by concurrent request");
                        return Ok(Op::Nop);
                    }
                }
                debug!(key, "query cache miss");
                match fetch.await {
                    Ok(value) => Ok(Op::Put(CacheEntry {
                        value,
                        fetched_at: Utc::now(),
                    })),
                    Err(err) => {
                        warn!(key, error = %err, "fetch failed, previous cache entry kept");
                        Err(err)
                    }
                }
            })
            .await?;

        match result {
            CompResult::Inserted(entry)
            | CompResult::ReplacedWith(entry)
            | CompResult::Unchanged(entry) => Ok(entry.into_value().value),
            _ => Err(DashboardError::FetchFailure {
                key: key.to_string(),
                reason: "cache entry evicted during refresh".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl Future<Output = DashboardResult<u32>> + Send + 'static {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            Ok(value)
        }
    }

    #[tokio::test]
    async fn test_staleness_window() {
        let cache: QueryCache<u32> = QueryCache::default();
        let t0 = Utc::now();
        assert!(cache.is_stale("k", t0).await);

        cache.set("k", 7, t0).await;
        assert!(!cache.is_stale("k", t0 + Duration::seconds(29)).await);
        assert!(cache.is_stale("k", t0 + Duration::seconds(30)).await);
        assert_eq!(cache.get("k").await.map(|e| e.value), Some(7));
    }

    #[tokio::test]
    async fn test_invalidate_is_targeted() {
        let cache: QueryCache<u32> = QueryCache::default();
        let now = Utc::now();
        cache.set("pipeline/status", 1, now).await;
        cache.set("pipeline/history", 2, now).await;
        cache.set("events?limit=50&offset=0", 3, now).await;

        let removed = cache
            .invalidate(["pipeline/status", "pipeline/history", "reports"])
            .await;
        assert_eq!(removed, 2);
        assert!(cache.get("pipeline/status").await.is_none());
        assert_eq!(
            cache.get("events?limit=50&offset=0").await.map(|e| e.value),
            Some(3)
        );
    }

    #[tokio::test]
    async fn test_fresh_entry_served_without_fetch() {
        let cache: QueryCache<u32> = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(cache.get_or_fetch("k", counting_fetch(&calls, 1)).await, Ok(1));
        assert_eq!(cache.get_or_fetch("k", counting_fetch(&calls, 2)).await, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_refetched() {
        let cache: QueryCache<u32> = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        cache.set("k", 1, Utc::now() - Duration::seconds(31)).await;

        assert_eq!(cache.get_or_fetch("k", counting_fetch(&calls, 2)).await, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_are_coalesced() {
        let cache: QueryCache<u32> = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b, c) = tokio::join!(
            cache.get_or_fetch("k", counting_fetch(&calls, 1)),
            cache.get_or_fetch("k", counting_fetch(&calls, 2)),
            cache.get_or_fetch("k", counting_fetch(&calls, 3)),
        );
        assert_eq!((a, b, c), (Ok(1), Ok(1), Ok(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_independently() {
        let cache: QueryCache<u32> = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.get_or_fetch("a", counting_fetch(&calls, 1)),
            cache.get_or_fetch("b", counting_fetch(&calls, 2)),
        );
        assert_eq!((a, b), (Ok(1), Ok(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_entry() {
        let cache: QueryCache<u32> = QueryCache::default();
        let fetched_at = Utc::now() - Duration::seconds(60);
        cache.set("k", 5, fetched_at).await;

        let result = cache
            .get_or_fetch("k", async {
                Err(DashboardError::FetchFailure {
                    key: "k".to_string(),
                    reason: "connection refused".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(DashboardError::FetchFailure { .. })));
        let entry = cache.get("k").await.unwrap();
        assert_eq!(entry.value, 5);
        assert_eq!(entry.fetched_at, fetched_at);
    }

    #[tokio::test]
    async fn test_invalidate_does_not_cancel_in_flight_request() {
        let cache: Arc<QueryCache<u32>> = Arc::new(QueryCache::default());
        let (started_tx, started_rx) = tokio::sync::oneshot::channel::<()>();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let pending = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .get_or_fetch("k", async move {
                        let _ = started_tx.send(());
                        let _ = release_rx.await;
                        Ok(9)
                    })
                    .await
            })
        };

        started_rx.await.unwrap();
        let (removed, ()) = tokio::join!(cache.invalidate(["k"]), async {
            let _ = release_tx.send(());
        });

        assert!(removed <= 1);
        assert_eq!(pending.await.unwrap(), Ok(9));
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let cache: QueryCache<u32> = QueryCache::with_limits(
            Duration::milliseconds(1),
            StdDuration::from_millis(5),
            DEFAULT_MAX_CAPACITY,
        );
        for i in 0..200u32 {
            let key = format!("events?offset={i}");
            cache.get_or_fetch(&key, async move { Ok(i) }).await.unwrap();
        }

        tokio::time::sleep(StdDuration::from_millis(50)).await;
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_bounds_distinct_keys() {
        let cache: QueryCache<u32> =
            QueryCache::with_limits(Duration::seconds(30), StdDuration::from_secs(300), 16);
        for i in 0..500u32 {
            cache.set(format!("events?offset={i}"), i, Utc::now()).await;
        }

        assert!(cache.entry_count().await <= 16);
    }
}
