//! The orchestrator tying registry, limiter, cache and adapters together.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::models::{QueryParams, SearchOptions, SearchResponse};
use super::retry::{retry, RetryPolicy};
use crate::cache::{cache_key, CacheEntry, ResultCache};
use crate::config::Settings;
use crate::error::{Result, SearchError};
use crate::network::HttpClient;
use crate::providers::{ProviderId, ProviderRegistry};
use crate::ratelimit::RateLimiter;
use crate::results::SearchResult;

/// Multi-provider search orchestrator.
///
/// One call runs: validate → cache lookup → rate limit → retried dispatch →
/// at most one cross-provider fallback → cache store. The whole network
/// phase sits under one deadline; cache hits never touch rate-limit state.
pub struct SearchService {
    registry: ProviderRegistry,
    cache: ResultCache,
    limiter: RateLimiter,
    client: HttpClient,
    settings: Settings,
}

impl SearchService {
    /// Build a service with the built-in adapters.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let registry = ProviderRegistry::from_settings(&settings);
        Self::with_registry(settings, registry)
    }

    /// Build a service around a caller-supplied registry. Used to swap in
    /// adapters pointed at local servers or test doubles.
    pub fn with_registry(settings: Settings, registry: ProviderRegistry) -> anyhow::Result<Self> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let cache = ResultCache::new(Duration::from_millis(settings.search.cache_ttl_ms));
        let limiter = RateLimiter::from_settings(&settings);
        Ok(Self {
            registry,
            cache,
            limiter,
            client,
            settings,
        })
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Run one search.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let search = &self.settings.search;
        let provider = options.provider.unwrap_or(search.default_provider);
        let explicit = options.provider.is_some();
        let limit = options.limit.unwrap_or(search.limit);
        let safe_search = options.safe_search.unwrap_or(search.safe_search);
        let timeout_ms = options.timeout_ms.unwrap_or(search.timeout_ms);

        self.registry.ensure_enabled(provider)?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResponse {
                results: Vec::new(),
                source: provider,
                cached: false,
            });
        }

        let key = cache_key(query, provider, limit, safe_search);
        if let Some(entry) = self.cache.get(&key).await {
            debug!(%provider, query, "cache hit");
            return Ok(SearchResponse {
                results: entry.results,
                source: entry.source,
                cached: true,
            });
        }

        info!(%provider, query, limit, "dispatching search");
        let params = QueryParams::new(query, limit, safe_search);
        let (mut results, source) = timeout(
            Duration::from_millis(timeout_ms),
            self.dispatch_with_fallback(provider, explicit, &params),
        )
        .await
        .map_err(|_| SearchError::Timeout { ms: timeout_ms })??;

        results.truncate(limit);
        self.cache
            .put(key, CacheEntry::new(results.clone(), source))
            .await;

        Ok(SearchResponse {
            results,
            source,
            cached: false,
        })
    }

    /// Dispatch to the primary provider, falling back at most once.
    ///
    /// Errors trigger the fallback on every path; an empty result set
    /// triggers it only when the caller did not pin a provider.
    async fn dispatch_with_fallback(
        &self,
        primary: ProviderId,
        explicit: bool,
        params: &QueryParams,
    ) -> Result<(Vec<SearchResult>, ProviderId)> {
        match self.dispatch(primary, params).await {
            Ok(results) if !results.is_empty() => Ok((results, primary)),
            Ok(empty) => {
                if explicit {
                    return Ok((empty, primary));
                }
                let Some(fallback) = self.fallback_target(primary) else {
                    return Ok((empty, primary));
                };
                warn!(%primary, %fallback, "no results from primary, trying fallback");
                match self.dispatch(fallback, params).await {
                    Ok(results) => Ok((results, fallback)),
                    // The primary call did succeed; its empty set stands.
                    Err(err) => {
                        warn!(%fallback, error = %err, "fallback failed, keeping empty primary result");
                        Ok((empty, primary))
                    }
                }
            }
            Err(primary_err) => {
                let Some(fallback) = self.fallback_target(primary) else {
                    return Err(primary_err);
                };
                warn!(%primary, %fallback, error = %primary_err, "primary failed, trying fallback");
                match self.dispatch(fallback, params).await {
                    Ok(results) => Ok((results, fallback)),
                    Err(fallback_err) => Err(SearchError::AllProvidersFailed {
                        primary: Box::new(primary_err),
                        fallback: Box::new(fallback_err),
                    }),
                }
            }
        }
    }

    /// Which provider to fall back to after `primary`, if any.
    fn fallback_target(&self, primary: ProviderId) -> Option<ProviderId> {
        let search = &self.settings.search;
        let target = if search.fallback_provider == primary {
            search.default_provider
        } else {
            search.fallback_provider
        };
        if target == primary || !self.registry.is_enabled(target) {
            return None;
        }
        Some(target)
    }

    /// One rate-limited, retried round trip to a single provider.
    async fn dispatch(&self, id: ProviderId, params: &QueryParams) -> Result<Vec<SearchResult>> {
        self.registry.ensure_enabled(id)?;
        let adapter = self.registry.adapter_of(id)?;
        let policy = RetryPolicy::from(self.settings.provider(id).retry);
        retry(policy, || {
            let adapter = adapter.clone();
            async move {
                // The interval gate applies to every attempt, retries included.
                self.limiter.acquire(id).await;
                adapter.fetch(&self.client, params).await
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderAdapter, ProviderConfig};
    use crate::network::{ProviderRequest, ProviderResponse};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    /// Scripted adapter: pops one outcome per fetch, then repeats the last.
    struct FakeAdapter {
        id: ProviderId,
        calls: Arc<AtomicUsize>,
        script: Mutex<VecDeque<Result<Vec<SearchResult>>>>,
        fallthrough: Result<Vec<SearchResult>>,
        delay: Duration,
    }

    impl FakeAdapter {
        fn new(id: ProviderId, fallthrough: Result<Vec<SearchResult>>) -> Self {
            Self {
                id,
                calls: Arc::new(AtomicUsize::new(0)),
                script: Mutex::new(VecDeque::new()),
                fallthrough,
                delay: Duration::ZERO,
            }
        }

        fn returning(id: ProviderId, results: Vec<SearchResult>) -> Self {
            Self::new(id, Ok(results))
        }

        fn failing(id: ProviderId) -> Self {
            Self::new(
                id,
                Err(SearchError::Fetch {
                    provider: id.to_string(),
                    message: "connection reset".into(),
                }),
            )
        }

        fn slow(id: ProviderId, delay: Duration) -> Self {
            let mut adapter = Self::returning(id, vec![hit(id, "slow")]);
            adapter.delay = delay;
            adapter
        }
    }

    #[async_trait]
    impl ProviderAdapter for FakeAdapter {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn request(&self, _params: &QueryParams) -> ProviderRequest {
            ProviderRequest::get(self.id.as_str(), "http://127.0.0.1:1/")
        }

        fn parse(&self, _response: ProviderResponse) -> Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }

        async fn fetch(
            &self,
            _client: &HttpClient,
            _params: &QueryParams,
        ) -> Result<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let scripted = self.script.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| self.fallthrough.clone())
        }
    }

    fn hit(source: ProviderId, title: &str) -> SearchResult {
        SearchResult::new(title, format!("https://{title}.example/"), source)
    }

    fn fast_settings() -> Settings {
        let mut settings = Settings::default();
        for provider in settings.providers.values_mut() {
            provider.min_interval_ms = 0;
            provider.retry.delay_ms = 5;
        }
        settings
    }

    fn service_with(
        settings: Settings,
        adapters: Vec<Arc<FakeAdapter>>,
    ) -> SearchService {
        let mut registry = ProviderRegistry::new();
        for adapter in adapters {
            let provider = settings.provider(adapter.id());
            registry.register(
                ProviderConfig {
                    name: adapter.id().to_string(),
                    enabled: provider.enabled,
                    experimental: provider.experimental,
                },
                adapter,
            );
        }
        SearchService::with_registry(settings, registry).expect("service builds")
    }

    #[tokio::test]
    async fn default_path_returns_primary_results_truncated_to_limit() {
        let ddg = Arc::new(FakeAdapter::returning(
            ProviderId::DuckDuckGo,
            (0..5)
                .map(|i| hit(ProviderId::DuckDuckGo, &format!("r{i}")))
                .collect(),
        ));
        let google = Arc::new(FakeAdapter::returning(ProviderId::Google, vec![]));
        let service = service_with(fast_settings(), vec![ddg.clone(), google.clone()]);

        let response = service
            .search("typescript programming", &SearchOptions::with_limit(2))
            .await
            .unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.source, ProviderId::DuckDuckGo);
        assert!(!response.cached);
        assert_eq!(ddg.calls.load(Ordering::SeqCst), 1);
        assert_eq!(google.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn identical_queries_hit_the_cache() {
        let ddg = Arc::new(FakeAdapter::returning(
            ProviderId::DuckDuckGo,
            vec![hit(ProviderId::DuckDuckGo, "cached")],
        ));
        let service = service_with(fast_settings(), vec![ddg.clone()]);

        let first = service.search("rust", &SearchOptions::default()).await.unwrap();
        let second = service.search("rust", &SearchOptions::default()).await.unwrap();
        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.results, second.results);
        assert_eq!(ddg.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn differing_options_do_not_share_cache_entries() {
        let ddg = Arc::new(FakeAdapter::returning(
            ProviderId::DuckDuckGo,
            vec![hit(ProviderId::DuckDuckGo, "a"), hit(ProviderId::DuckDuckGo, "b")],
        ));
        let service = service_with(fast_settings(), vec![ddg.clone()]);

        service.search("rust", &SearchOptions::with_limit(1)).await.unwrap();
        service.search("rust", &SearchOptions::with_limit(2)).await.unwrap();
        assert_eq!(ddg.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_cache_entries_trigger_a_fresh_dispatch() {
        let ddg = Arc::new(FakeAdapter::returning(
            ProviderId::DuckDuckGo,
            vec![hit(ProviderId::DuckDuckGo, "fresh")],
        ));
        let mut settings = fast_settings();
        settings.search.cache_ttl_ms = 40;
        let service = service_with(settings, vec![ddg.clone()]);

        service.search("rust", &SearchOptions::default()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let again = service.search("rust", &SearchOptions::default()).await.unwrap();
        assert!(!again.cached);
        assert_eq!(ddg.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn disabled_provider_is_rejected_without_network() {
        let brave = Arc::new(FakeAdapter::returning(
            ProviderId::Brave,
            vec![hit(ProviderId::Brave, "x")],
        ));
        let ddg = Arc::new(FakeAdapter::returning(ProviderId::DuckDuckGo, vec![]));
        let service = service_with(fast_settings(), vec![brave.clone(), ddg]);

        let err = service
            .search("rust", &SearchOptions::with_provider(ProviderId::Brave))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "PROVIDER_DISABLED");
        assert_eq!(brave.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_back_once_with_retries_first() {
        let ddg = Arc::new(FakeAdapter::failing(ProviderId::DuckDuckGo));
        let google = Arc::new(FakeAdapter::returning(
            ProviderId::Google,
            vec![hit(ProviderId::Google, "backup")],
        ));
        let service = service_with(fast_settings(), vec![ddg.clone(), google.clone()]);

        let response = service.search("rust", &SearchOptions::default()).await.unwrap();
        assert_eq!(response.source, ProviderId::Google);
        assert_eq!(response.results.len(), 1);
        // DuckDuckGo retries twice per its policy before the fallback runs.
        assert_eq!(ddg.calls.load(Ordering::SeqCst), 2);
        assert_eq!(google.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_primary_falls_back_on_the_default_path_only() {
        let ddg = Arc::new(FakeAdapter::returning(ProviderId::DuckDuckGo, vec![]));
        let google = Arc::new(FakeAdapter::returning(
            ProviderId::Google,
            vec![hit(ProviderId::Google, "filled")],
        ));
        let service = service_with(fast_settings(), vec![ddg.clone(), google.clone()]);

        let auto = service.search("rust", &SearchOptions::default()).await.unwrap();
        assert_eq!(auto.source, ProviderId::Google);
        assert_eq!(google.calls.load(Ordering::SeqCst), 1);

        let pinned = service
            .search(
                "different query",
                &SearchOptions::with_provider(ProviderId::DuckDuckGo),
            )
            .await
            .unwrap();
        assert!(pinned.results.is_empty());
        assert_eq!(pinned.source, ProviderId::DuckDuckGo);
        assert_eq!(google.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_primary_with_failing_fallback_keeps_the_empty_success() {
        let ddg = Arc::new(FakeAdapter::returning(ProviderId::DuckDuckGo, vec![]));
        let google = Arc::new(FakeAdapter::failing(ProviderId::Google));
        let service = service_with(fast_settings(), vec![ddg, google]);

        let response = service.search("rust", &SearchOptions::default()).await.unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.source, ProviderId::DuckDuckGo);
    }

    #[tokio::test]
    async fn both_providers_failing_reports_both_causes() {
        let ddg = Arc::new(FakeAdapter::failing(ProviderId::DuckDuckGo));
        let google = Arc::new(FakeAdapter::failing(ProviderId::Google));
        let service = service_with(fast_settings(), vec![ddg, google]);

        let err = service.search("rust", &SearchOptions::default()).await.unwrap_err();
        assert_eq!(err.code(), "ALL_PROVIDERS_FAILED");
        let text = err.to_string();
        assert!(text.contains("duckduckgo"));
        assert!(text.contains("google"));
    }

    #[tokio::test]
    async fn explicit_fallback_provider_falls_back_to_the_default() {
        let ddg = Arc::new(FakeAdapter::returning(
            ProviderId::DuckDuckGo,
            vec![hit(ProviderId::DuckDuckGo, "default")],
        ));
        let google = Arc::new(FakeAdapter::failing(ProviderId::Google));
        let service = service_with(fast_settings(), vec![ddg.clone(), google]);

        let response = service
            .search("rust", &SearchOptions::with_provider(ProviderId::Google))
            .await
            .unwrap();
        assert_eq!(response.source, ProviderId::DuckDuckGo);
        assert_eq!(ddg.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let ddg = Arc::new(FakeAdapter::slow(
            ProviderId::DuckDuckGo,
            Duration::from_millis(500),
        ));
        let google = Arc::new(FakeAdapter::slow(
            ProviderId::Google,
            Duration::from_millis(500),
        ));
        let service = service_with(fast_settings(), vec![ddg, google]);

        let options = SearchOptions {
            timeout_ms: Some(50),
            ..SearchOptions::default()
        };
        let err = service.search("rust", &options).await.unwrap_err();
        assert_eq!(err.code(), "TIMEOUT");
        assert!(err.to_string().contains("50"));
    }

    #[tokio::test]
    async fn consecutive_dispatches_respect_the_provider_interval() {
        let ddg = Arc::new(FakeAdapter::returning(
            ProviderId::DuckDuckGo,
            vec![hit(ProviderId::DuckDuckGo, "spaced")],
        ));
        let mut settings = fast_settings();
        if let Some(provider) = settings.providers.get_mut(&ProviderId::DuckDuckGo) {
            provider.min_interval_ms = 100;
        }
        let service = service_with(settings, vec![ddg]);

        let start = Instant::now();
        service.search("first", &SearchOptions::default()).await.unwrap();
        service.search("second", &SearchOptions::default()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn empty_query_short_circuits() {
        let ddg = Arc::new(FakeAdapter::returning(
            ProviderId::DuckDuckGo,
            vec![hit(ProviderId::DuckDuckGo, "never")],
        ));
        let service = service_with(fast_settings(), vec![ddg.clone()]);

        let response = service.search("   ", &SearchOptions::default()).await.unwrap();
        assert!(response.results.is_empty());
        assert_eq!(ddg.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fallback_results_are_cached_under_the_requested_key() {
        let ddg = Arc::new(FakeAdapter::failing(ProviderId::DuckDuckGo));
        let google = Arc::new(FakeAdapter::returning(
            ProviderId::Google,
            vec![hit(ProviderId::Google, "backup")],
        ));
        let service = service_with(fast_settings(), vec![ddg.clone(), google.clone()]);

        service.search("rust", &SearchOptions::default()).await.unwrap();
        let cached = service.search("rust", &SearchOptions::default()).await.unwrap();
        assert!(cached.cached);
        assert_eq!(cached.source, ProviderId::Google);
        // Neither provider is touched again on the cache hit.
        assert_eq!(ddg.calls.load(Ordering::SeqCst), 2);
        assert_eq!(google.calls.load(Ordering::SeqCst), 1);
    }
}
