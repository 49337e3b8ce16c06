//! Settings structures for the search engine configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::providers::ProviderId;

/// Main settings structure, loadable from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub providers: HashMap<ProviderId, ProviderSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut settings: Settings = serde_yaml::from_str(&content)?;
        // Providers absent from the file keep their built-in defaults.
        for (id, defaults) in default_providers() {
            settings.providers.entry(id).or_insert(defaults);
        }
        Ok(settings)
    }

    /// Merge with environment variables (OMNISEARCH_* prefix).
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("OMNISEARCH_DEFAULT_PROVIDER") {
            if let Ok(id) = val.parse() {
                self.search.default_provider = id;
            }
        }
        if let Ok(val) = std::env::var("OMNISEARCH_FALLBACK_PROVIDER") {
            if let Ok(id) = val.parse() {
                self.search.fallback_provider = id;
            }
        }
        if let Ok(val) = std::env::var("OMNISEARCH_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.search.timeout_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("OMNISEARCH_CACHE_TTL_MS") {
            if let Ok(ms) = val.parse() {
                self.search.cache_ttl_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("OMNISEARCH_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.search.limit = limit;
            }
        }
    }

    /// Settings for a single provider, falling back to built-in defaults
    /// for providers never mentioned in the loaded file.
    pub fn provider(&self, id: ProviderId) -> ProviderSettings {
        self.providers
            .get(&id)
            .cloned()
            .unwrap_or_else(|| ProviderSettings::builtin(id))
    }

    /// Minimum spacing between consecutive dispatches to a provider.
    pub fn min_interval(&self, id: ProviderId) -> Duration {
        Duration::from_millis(self.provider(id).min_interval_ms)
    }
}

/// Search behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Provider used when the caller does not name one.
    pub default_provider: ProviderId,
    /// Provider tried when the primary fails or returns nothing.
    pub fallback_provider: ProviderId,
    /// Maximum number of results returned per call.
    pub limit: usize,
    /// Safe search filtering.
    pub safe_search: bool,
    /// Overall deadline for one search call, in milliseconds.
    pub timeout_ms: u64,
    /// How long cached result sets stay fresh, in milliseconds.
    pub cache_ttl_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_provider: ProviderId::DuckDuckGo,
            fallback_provider: ProviderId::Google,
            limit: crate::DEFAULT_LIMIT,
            safe_search: true,
            timeout_ms: crate::DEFAULT_TIMEOUT_MS,
            cache_ttl_ms: 3_600_000,
        }
    }
}

/// Outgoing request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-request transport timeout in seconds.
    pub request_timeout: f64,
    /// Maximum idle connections per host.
    pub pool_maxsize: usize,
    /// Verify TLS certificates.
    pub verify_ssl: bool,
    /// Extra headers sent with every request.
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 8.0,
            pool_maxsize: 20,
            verify_ssl: true,
            extra_headers: HashMap::new(),
        }
    }
}

/// Per-provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Whether the provider may be dispatched to at all.
    pub enabled: bool,
    /// Experimental providers are registered but ship disabled.
    pub experimental: bool,
    /// Minimum spacing between dispatches, in milliseconds.
    pub min_interval_ms: u64,
    /// Retry behavior for transient failures.
    pub retry: RetrySettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            experimental: false,
            min_interval_ms: 1_000,
            retry: RetrySettings::default(),
        }
    }
}

impl ProviderSettings {
    /// Built-in settings for a provider, as shipped.
    pub fn builtin(id: ProviderId) -> Self {
        match id {
            ProviderId::DuckDuckGo => Self {
                min_interval_ms: 2_000,
                retry: RetrySettings {
                    max_attempts: 2,
                    delay_ms: 1_000,
                },
                ..Self::default()
            },
            ProviderId::Google => Self::default(),
            ProviderId::Brave => Self {
                enabled: false,
                experimental: true,
                ..Self::default()
            },
            ProviderId::Ecosia => Self {
                enabled: false,
                ..Self::default()
            },
        }
    }
}

/// Retry policy for one provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            delay_ms: 1_000,
        }
    }
}

fn default_providers() -> HashMap<ProviderId, ProviderSettings> {
    ProviderId::ALL
        .into_iter()
        .map(|id| (id, ProviderSettings::builtin(id)))
        .collect()
}
