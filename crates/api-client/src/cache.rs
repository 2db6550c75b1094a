//! Time-to-live cache for raw feed responses.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A cached response body and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedBody {
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Entry {
    cached: CachedBody,
    expires_at: Instant,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, Entry>,
    ttl: Duration,
}

/// Shared cache of feed bodies keyed by request identity (the URL).
///
/// A zero TTL disables the cache: reads always miss and writes are dropped.
/// Cloning is cheap; clones share the same entries.
#[derive(Debug, Clone)]
pub struct FeedCache {
    inner: Arc<RwLock<Inner>>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries: HashMap::new(),
                ttl,
            })),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns the entry for `key` if present and not yet expired.
    pub async fn get(&self, key: &str) -> Option<CachedBody> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.cached.clone())
    }

    /// Stores `cached` under `key` for the configured TTL.
    pub async fn insert(&self, key: impl Into<String>, cached: CachedBody) {
        let mut inner = self.inner.write().await;
        if inner.ttl.is_zero() {
            return;
        }
        let expires_at = Instant::now() + inner.ttl;
        inner
            .entries
            .insert(key.into(), Entry { cached, expires_at });
    }

    /// Drops expired entries and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        let now = Instant::now();
        inner.entries.retain(|_, entry| entry.expires_at > now);
        before - inner.entries.len()
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn ttl(&self) -> Duration {
        self.inner.read().await.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str) -> CachedBody {
        CachedBody {
            body: text.to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = FeedCache::new(Duration::from_secs(60));
        assert!(cache.get("feed").await.is_none());

        cache.insert("feed", body("one")).await;
        assert_eq!(cache.get("feed").await.unwrap().body, "one");

        cache.insert("feed", body("two")).await;
        assert_eq!(cache.get("feed").await.unwrap().body, "two");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn entries_expire() {
        let cache = FeedCache::new(Duration::from_millis(50));
        cache.insert("feed", body("stale")).await;
        assert!(cache.get("feed").await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(cache.get("feed").await.is_none());
        assert_eq!(cache.purge_expired().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn disabled_cache_stores_nothing() {
        let cache = FeedCache::disabled();
        cache.insert("feed", body("ignored")).await;
        assert!(cache.get("feed").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn keys_are_independent_and_clones_share_state() {
        let cache = FeedCache::new(Duration::from_secs(60));
        let clone = cache.clone();
        clone.insert("a", body("A")).await;
        cache.insert("b", body("B")).await;

        assert_eq!(cache.get("a").await.unwrap().body, "A");
        assert_eq!(clone.get("b").await.unwrap().body, "B");
        assert_eq!(clone.len().await, 2);
        assert_eq!(clone.ttl().await, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn purge_keeps_live_entries() {
        let cache = FeedCache::new(Duration::from_secs(60));
        cache.insert("feed", body("live")).await;
        assert_eq!(cache.purge_expired().await, 0);
        assert_eq!(cache.len().await, 1);
    }
}
