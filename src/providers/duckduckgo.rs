//! DuckDuckGo provider (HTML endpoint).

use std::collections::HashMap;

use scraper::ElementRef;

use super::traits::ProviderAdapter;
use super::ProviderId;
use crate::error::Result;
use crate::extract::{self, href_of, SelectorConfig};
use crate::html::strip_noise;
use crate::network::{ProviderRequest, ProviderResponse};
use crate::results::SearchResult;
use crate::search::QueryParams;

const SELECTORS: SelectorConfig = SelectorConfig {
    title: Some("a.result__a"),
    url_extractor: Some(decode_redirect_href),
    snippet: Some("a.result__snippet"),
    exclude: &["div.result--ad"],
    // Result hrefs are protocol-relative redirect links.
    base_url: Some("https://duckduckgo.com"),
    ..SelectorConfig::new("div.result")
};

/// DuckDuckGo result links point at a redirect endpoint carrying the real
/// destination in the `uddg` query parameter.
fn decode_redirect_href(node: &ElementRef<'_>) -> Option<String> {
    let node = node
        .select(&scraper::Selector::parse("a.result__a").expect("constant selector parses"))
        .next()?;
    let href = href_of(&node)?;
    let Some(start) = href.find("uddg=") else {
        return Some(href);
    };
    let encoded = &href[start + 5..];
    let encoded = encoded.split('&').next().unwrap_or(encoded);
    match urlencoding::decode(encoded) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(href),
    }
}

/// DuckDuckGo web search via the no-JS HTML frontend.
pub struct DuckDuckGo {
    html_url: String,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            html_url: "https://html.duckduckgo.com/html/".to_string(),
        }
    }

    /// Point the adapter at a different endpoint (local test servers).
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            html_url: url.into(),
        }
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for DuckDuckGo {
    fn id(&self) -> ProviderId {
        ProviderId::DuckDuckGo
    }

    fn request(&self, params: &QueryParams) -> ProviderRequest {
        let mut form = HashMap::new();
        form.insert("q".to_string(), params.query.clone());
        form.insert("b".to_string(), String::new());
        form.insert("kl".to_string(), "us-en".to_string());
        let kp = if params.safe_search { "1" } else { "-2" };
        form.insert("kp".to_string(), kp.to_string());

        ProviderRequest::post(self.id().as_str(), &self.html_url).form(form)
    }

    fn parse(&self, response: ProviderResponse) -> Result<Vec<SearchResult>> {
        let html = strip_noise(&response.text);
        extract::extract(&html, &SELECTORS, self.id())
    }
}
