//! Per-provider dispatch spacing.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovernorLimiter};
use std::collections::HashMap;
use std::time::Duration;

use crate::config::Settings;
use crate::providers::ProviderId;

/// Enforces a minimum interval between consecutive dispatches to each
/// provider. Limiters are independent per provider; concurrent callers of
/// the same provider are serialized by the limiter's shared state.
pub struct RateLimiter {
    limiters: HashMap<ProviderId, Option<DefaultDirectRateLimiter>>,
}

impl RateLimiter {
    /// Build one limiter per known provider from the configured intervals.
    /// A zero interval disables limiting for that provider.
    pub fn from_settings(settings: &Settings) -> Self {
        let limiters = ProviderId::ALL
            .into_iter()
            .map(|id| (id, Self::limiter_for(settings.min_interval(id))))
            .collect();
        Self { limiters }
    }

    fn limiter_for(interval: Duration) -> Option<DefaultDirectRateLimiter> {
        let quota = Quota::with_period(interval)?;
        Some(GovernorLimiter::direct(quota))
    }

    /// Wait until a dispatch to `id` is allowed. Returns immediately when
    /// the interval has already elapsed since the previous dispatch.
    pub async fn acquire(&self, id: ProviderId) {
        if let Some(Some(limiter)) = self.limiters.get(&id) {
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn limiter_with_interval(ms: u64) -> RateLimiter {
        let mut settings = Settings::default();
        for provider in settings.providers.values_mut() {
            provider.min_interval_ms = ms;
        }
        RateLimiter::from_settings(&settings)
    }

    #[tokio::test]
    async fn second_acquire_waits_for_the_interval() {
        let limiter = limiter_with_interval(80);
        let start = Instant::now();
        limiter.acquire(ProviderId::Google).await;
        limiter.acquire(ProviderId::Google).await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn providers_are_independent() {
        let limiter = limiter_with_interval(200);
        limiter.acquire(ProviderId::Google).await;
        let start = Instant::now();
        limiter.acquire(ProviderId::DuckDuckGo).await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn zero_interval_never_blocks() {
        let limiter = limiter_with_interval(0);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire(ProviderId::Ecosia).await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
