//! Brave Search provider (scraped result pages). Experimental.

use super::traits::ProviderAdapter;
use super::ProviderId;
use crate::error::Result;
use crate::extract::{self, SelectorConfig};
use crate::html::strip_noise;
use crate::network::{ProviderRequest, ProviderResponse};
use crate::results::SearchResult;
use crate::search::QueryParams;

const SELECTORS: SelectorConfig = SelectorConfig {
    title: Some("div.title"),
    url: Some("a.result-header, a.h"),
    snippet: Some("div.snippet-description"),
    exclude: &["div.snippet.standalone"],
    base_url: Some("https://search.brave.com"),
    ..SelectorConfig::new("div.snippet")
};

/// Brave web search. Markup changes frequently; ships disabled.
pub struct Brave {
    base_url: String,
}

impl Brave {
    pub fn new() -> Self {
        Self {
            base_url: "https://search.brave.com/search".to_string(),
        }
    }

    /// Point the adapter at a different endpoint (local test servers).
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self { base_url: url.into() }
    }
}

impl Default for Brave {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for Brave {
    fn id(&self) -> ProviderId {
        ProviderId::Brave
    }

    fn request(&self, params: &QueryParams) -> ProviderRequest {
        let safesearch = if params.safe_search { "strict" } else { "off" };
        ProviderRequest::get(self.id().as_str(), &self.base_url)
            .param("q", &params.query)
            .param("safesearch", safesearch)
            .param("source", "web")
    }

    fn parse(&self, response: ProviderResponse) -> Result<Vec<SearchResult>> {
        let html = strip_noise(&response.text);
        extract::extract(&html, &SELECTORS, self.id())
    }
}
