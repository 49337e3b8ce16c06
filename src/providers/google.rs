//! Google provider (scraped result pages).

use scraper::ElementRef;

use super::traits::ProviderAdapter;
use super::ProviderId;
use crate::error::{Result, SearchError};
use crate::extract::{self, href_of, SelectorConfig};
use crate::html::strip_noise;
use crate::network::{ProviderRequest, ProviderResponse};
use crate::results::SearchResult;
use crate::search::QueryParams;

const SELECTORS: SelectorConfig = SelectorConfig {
    title: Some("h3"),
    url_extractor: Some(unwrap_redirect_href),
    snippet: Some("div.VwiC3b, span.aCOpRe"),
    base_url: Some("https://www.google.com"),
    ..SelectorConfig::new("div.g")
};

/// Older result markup wraps destinations as `/url?q=<dest>&...`.
fn unwrap_redirect_href(node: &ElementRef<'_>) -> Option<String> {
    let node = node
        .select(&scraper::Selector::parse("a").expect("constant selector parses"))
        .next()?;
    let href = href_of(&node)?;
    let Some(rest) = href.strip_prefix("/url?q=") else {
        return Some(href);
    };
    let encoded = rest.split('&').next().unwrap_or(rest);
    match urlencoding::decode(encoded) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(href),
    }
}

/// Google web search.
pub struct Google {
    base_url: String,
}

impl Google {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.google.com/search".to_string(),
        }
    }

    /// Point the adapter at a different endpoint (local test servers).
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self { base_url: url.into() }
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for Google {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn request(&self, params: &QueryParams) -> ProviderRequest {
        let safe = if params.safe_search { "active" } else { "off" };
        ProviderRequest::get(self.id().as_str(), &self.base_url)
            .param("q", &params.query)
            .param("num", params.limit.to_string())
            .param("hl", "en")
            .param("safe", safe)
    }

    fn parse(&self, response: ProviderResponse) -> Result<Vec<SearchResult>> {
        if response.text.contains("detected unusual traffic") {
            return Err(SearchError::Fetch {
                provider: self.id().to_string(),
                message: "blocked by CAPTCHA interstitial".to_string(),
            });
        }
        let html = strip_noise(&response.text);
        extract::extract(&html, &SELECTORS, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(text: &str) -> ProviderResponse {
        ProviderResponse {
            status: 200,
            headers: HashMap::new(),
            text: text.to_string(),
            url: "https://www.google.com/search".to_string(),
        }
    }

    #[test]
    fn request_carries_query_limit_and_safe_search() {
        let google = Google::new();
        let request = google.request(&QueryParams::new("rust programming", 5, true));

        assert!(request.url.contains("google.com"));
        assert_eq!(request.params.get("q").map(String::as_str), Some("rust programming"));
        assert_eq!(request.params.get("num").map(String::as_str), Some("5"));
        assert_eq!(request.params.get("safe").map(String::as_str), Some("active"));
    }

    #[test]
    fn parse_extracts_results_and_unwraps_redirects() {
        let html = r#"
            <div class="g">
              <a href="/url?q=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2F&sa=U"><h3>The Book</h3></a>
              <div class="VwiC3b">Learn Rust.</div>
            </div>
            <div class="g">
              <a href="https://crates.io/"><h3>crates.io</h3></a>
            </div>"#;
        let google = Google::new();
        let results = google.parse(response(html)).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://doc.rust-lang.org/book/");
        assert_eq!(results[0].title, "The Book");
        assert_eq!(results[0].snippet.as_deref(), Some("Learn Rust."));
        assert_eq!(results[1].url, "https://crates.io/");
        assert!(results[1].snippet.is_none());
    }

    #[test]
    fn captcha_page_is_a_fetch_error() {
        let google = Google::new();
        let err = google
            .parse(response("<html>Our systems have detected unusual traffic</html>"))
            .unwrap_err();
        assert_eq!(err.code(), "PROVIDER_FETCH_ERROR");
    }
}
