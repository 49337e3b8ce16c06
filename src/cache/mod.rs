//! TTL cache for completed result sets.

use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

use crate::providers::ProviderId;
use crate::results::SearchResult;

/// One cached result set, tagged with the provider that actually produced
/// it (after fallback this can differ from the provider in the key).
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub results: Vec<SearchResult>,
    pub source: ProviderId,
    pub fetched_at: Instant,
}

impl CacheEntry {
    pub fn new(results: Vec<SearchResult>, source: ProviderId) -> Self {
        Self {
            results,
            source,
            fetched_at: Instant::now(),
        }
    }
}

/// Async TTL cache over completed searches. Unbounded; entries expire on
/// the configured time-to-live only.
#[derive(Clone)]
pub struct ResultCache {
    cache: Cache<String, CacheEntry>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().time_to_live(ttl).build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        self.cache.get(key).await
    }

    /// Insert, overwriting any entry already under this key.
    pub async fn put(&self, key: String, entry: CacheEntry) {
        self.cache.insert(key, entry).await;
    }

    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

/// Deterministic key over everything that can change the result payload.
///
/// The call timeout is deliberately excluded: it changes how long we wait,
/// never what comes back. Callers pass fully resolved values so defaulted
/// and explicit-default options produce the same key.
pub fn cache_key(query: &str, provider: ProviderId, limit: usize, safe_search: bool) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update([0]);
    hasher.update(provider.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(limit.to_le_bytes());
    hasher.update([safe_search as u8]);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[test]
    fn key_is_deterministic_and_sensitive_to_each_field() {
        let base = cache_key("rust async", ProviderId::DuckDuckGo, 10, true);
        assert_eq!(base, cache_key("rust async", ProviderId::DuckDuckGo, 10, true));
        assert_ne!(base, cache_key("rust sync", ProviderId::DuckDuckGo, 10, true));
        assert_ne!(base, cache_key("rust async", ProviderId::Google, 10, true));
        assert_ne!(base, cache_key("rust async", ProviderId::DuckDuckGo, 5, true));
        assert_ne!(base, cache_key("rust async", ProviderId::DuckDuckGo, 10, false));
    }

    #[tokio::test]
    async fn put_then_get_returns_the_entry() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let results = vec![SearchResult::new("a", "https://a.example", ProviderId::Google)];
        cache
            .put("k".to_string(), CacheEntry::new(results.clone(), ProviderId::Google))
            .await;
        let entry = cache.get("k").await.expect("fresh entry present");
        assert_eq!(entry.results, results);
        assert_eq!(entry.source, ProviderId::Google);
    }

    #[tokio::test]
    async fn expired_entries_are_gone() {
        let cache = ResultCache::new(Duration::from_millis(50));
        cache
            .put("k".to_string(), CacheEntry::new(vec![], ProviderId::Ecosia))
            .await;
        assert!(cache.get("k").await.is_some());
        sleep(Duration::from_millis(120)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn put_overwrites_existing_entry() {
        let cache = ResultCache::new(Duration::from_secs(60));
        cache
            .put("k".to_string(), CacheEntry::new(vec![], ProviderId::Google))
            .await;
        let newer = vec![SearchResult::new("b", "https://b.example", ProviderId::Brave)];
        cache
            .put("k".to_string(), CacheEntry::new(newer.clone(), ProviderId::Brave))
            .await;
        let entry = cache.get("k").await.unwrap();
        assert_eq!(entry.results, newer);
        assert_eq!(entry.source, ProviderId::Brave);
    }
}
