//! Provider registry: the immutable id → (config, adapter) table.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::ProviderAdapter;
use super::{brave, duckduckgo, ecosia, google, ProviderId};
use crate::config::Settings;
use crate::error::{Result, SearchError};

/// Static facts about one registered provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub enabled: bool,
    pub experimental: bool,
}

struct ProviderEntry {
    config: ProviderConfig,
    adapter: Arc<dyn ProviderAdapter>,
}

/// Immutable after construction; built once at startup and shared.
pub struct ProviderRegistry {
    entries: HashMap<ProviderId, ProviderEntry>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register all built-in adapters with enablement from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();
        let adapters: [Arc<dyn ProviderAdapter>; 4] = [
            Arc::new(duckduckgo::DuckDuckGo::new()),
            Arc::new(google::Google::new()),
            Arc::new(brave::Brave::new()),
            Arc::new(ecosia::Ecosia::new()),
        ];
        for adapter in adapters {
            let id = adapter.id();
            let provider = settings.provider(id);
            registry.register(
                ProviderConfig {
                    name: id.to_string(),
                    enabled: provider.enabled,
                    experimental: provider.experimental,
                },
                adapter,
            );
        }
        registry
    }

    /// Consumed during construction only; the registry is never mutated
    /// after it is handed to the service.
    pub fn register(&mut self, config: ProviderConfig, adapter: Arc<dyn ProviderAdapter>) {
        self.entries
            .insert(adapter.id(), ProviderEntry { config, adapter });
    }

    pub fn config_of(&self, id: ProviderId) -> Result<&ProviderConfig> {
        self.entries
            .get(&id)
            .map(|entry| &entry.config)
            .ok_or_else(|| SearchError::UnknownProvider { id: id.to_string() })
    }

    pub fn adapter_of(&self, id: ProviderId) -> Result<Arc<dyn ProviderAdapter>> {
        self.entries
            .get(&id)
            .map(|entry| Arc::clone(&entry.adapter))
            .ok_or_else(|| SearchError::UnknownProvider { id: id.to_string() })
    }

    pub fn is_enabled(&self, id: ProviderId) -> bool {
        self.entries
            .get(&id)
            .map(|entry| entry.config.enabled)
            .unwrap_or(false)
    }

    /// Gate a dispatch: unknown ids and disabled providers are rejected
    /// before any network or rate-limit state is touched.
    pub fn ensure_enabled(&self, id: ProviderId) -> Result<()> {
        let config = self.config_of(id)?;
        if !config.enabled {
            return Err(SearchError::ProviderDisabled {
                id: id.to_string(),
                experimental: config.experimental,
            });
        }
        Ok(())
    }

    pub fn enabled_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.is_enabled(*id))
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
