//! Wikipedia lookup via the MediaWiki action API and Wikimedia REST API.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, SearchError};
use crate::network::user_agent::accept_json;
use crate::network::{HttpClient, ProviderRequest};

const SOURCE: &str = "wikipedia";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// One article hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikipediaResult {
    pub title: String,
    pub url: String,
    /// Short match context from the search API.
    pub snippet: Option<String>,
    /// Lead-section extract from the summary API.
    pub extract: Option<String>,
    pub thumbnail: Option<String>,
}

/// Wikipedia client for one language edition.
pub struct Wikipedia {
    base_url: String,
}

impl Wikipedia {
    pub fn new() -> Self {
        Self::with_base_url("https://en.wikipedia.org")
    }

    /// Point the client at a different host (other editions, test servers).
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into(),
        }
    }

    /// Full-text article search.
    pub async fn search(
        &self,
        client: &HttpClient,
        query: &str,
        limit: usize,
    ) -> Result<Vec<WikipediaResult>> {
        let request = ProviderRequest::get(SOURCE, format!("{}/w/api.php", self.base_url))
            .param("action", "query")
            .param("list", "search")
            .param("srsearch", query)
            .param("srlimit", limit.to_string())
            .param("format", "json")
            .header("Accept", accept_json());
        let response = client.execute(request).await?;
        if !response.is_success() {
            return Err(fetch_error(response.status));
        }
        parse_search(&response.text, &self.base_url)
    }

    /// Lead-section summary of one article by title.
    pub async fn summary(&self, client: &HttpClient, title: &str) -> Result<WikipediaResult> {
        let encoded = urlencoding::encode(&title.replace(' ', "_")).into_owned();
        let request = ProviderRequest::get(
            SOURCE,
            format!("{}/api/rest_v1/page/summary/{}", self.base_url, encoded),
        )
        .header("Accept", accept_json());
        let response = client.execute(request).await?;
        if !response.is_success() {
            return Err(fetch_error(response.status));
        }
        parse_summary(&response.text, &self.base_url)
    }
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_error(status: u16) -> SearchError {
    SearchError::Fetch {
        provider: SOURCE.to_string(),
        message: format!("HTTP status {status}"),
    }
}

fn malformed() -> SearchError {
    SearchError::MalformedHtml {
        provider: SOURCE.to_string(),
    }
}

fn article_url(base_url: &str, title: &str) -> String {
    let encoded = urlencoding::encode(&title.replace(' ', "_")).into_owned();
    format!("{base_url}/wiki/{encoded}")
}

fn parse_search(text: &str, base_url: &str) -> Result<Vec<WikipediaResult>> {
    #[derive(Deserialize)]
    struct Payload {
        query: Query,
    }
    #[derive(Deserialize)]
    struct Query {
        search: Vec<Hit>,
    }
    #[derive(Deserialize)]
    struct Hit {
        title: String,
        #[serde(default)]
        snippet: String,
    }

    let payload: Payload = serde_json::from_str(text).map_err(|_| malformed())?;
    Ok(payload
        .query
        .search
        .into_iter()
        .map(|hit| {
            // The search API highlights matches with inline markup.
            let snippet = TAG_RE.replace_all(&hit.snippet, "").trim().to_string();
            WikipediaResult {
                url: article_url(base_url, &hit.title),
                title: hit.title,
                snippet: (!snippet.is_empty()).then_some(snippet),
                extract: None,
                thumbnail: None,
            }
        })
        .collect())
}

fn parse_summary(text: &str, base_url: &str) -> Result<WikipediaResult> {
    #[derive(Deserialize)]
    struct Payload {
        title: String,
        #[serde(default)]
        extract: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        thumbnail: Option<Thumbnail>,
        #[serde(default)]
        content_urls: Option<ContentUrls>,
    }
    #[derive(Deserialize)]
    struct Thumbnail {
        source: String,
    }
    #[derive(Deserialize)]
    struct ContentUrls {
        desktop: PageUrl,
    }
    #[derive(Deserialize)]
    struct PageUrl {
        page: String,
    }

    let payload: Payload = serde_json::from_str(text).map_err(|_| malformed())?;
    let url = payload
        .content_urls
        .map(|c| c.desktop.page)
        .unwrap_or_else(|| article_url(base_url, &payload.title));
    Ok(WikipediaResult {
        title: payload.title,
        url,
        snippet: payload.description,
        extract: payload.extract,
        thumbnail: payload.thumbnail.map(|t| t.source),
    })
}
