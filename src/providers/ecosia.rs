//! Ecosia provider (scraped result pages).

use super::traits::ProviderAdapter;
use super::ProviderId;
use crate::error::Result;
use crate::extract::{self, SelectorConfig};
use crate::html::strip_noise;
use crate::network::{ProviderRequest, ProviderResponse};
use crate::results::SearchResult;
use crate::search::QueryParams;

const SELECTORS: SelectorConfig = SelectorConfig {
    title: Some("a.result__title, div.result-title"),
    url: Some("a.result__link, a.result__title"),
    snippet: Some("p.result__snippet, div.result-snippet"),
    base_url: Some("https://www.ecosia.org"),
    ..SelectorConfig::new("div.result")
};

/// Ecosia web search (Bing-backed). Ships disabled.
pub struct Ecosia {
    base_url: String,
}

impl Ecosia {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.ecosia.org/search".to_string(),
        }
    }

    /// Point the adapter at a different endpoint (local test servers).
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self { base_url: url.into() }
    }
}

impl Default for Ecosia {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for Ecosia {
    fn id(&self) -> ProviderId {
        ProviderId::Ecosia
    }

    fn request(&self, params: &QueryParams) -> ProviderRequest {
        ProviderRequest::get(self.id().as_str(), &self.base_url)
            .param("q", &params.query)
            // 0 = off, 1 = moderate, 2 = strict
            .param("safesearch", if params.safe_search { "2" } else { "0" })
    }

    fn parse(&self, response: ProviderResponse) -> Result<Vec<SearchResult>> {
        let html = strip_noise(&response.text);
        extract::extract(&html, &SELECTORS, self.id())
    }
}
