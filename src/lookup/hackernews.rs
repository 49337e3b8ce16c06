//! Hacker News lookup via the Firebase API.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::network::user_agent::accept_json;
use crate::network::{HttpClient, ProviderRequest};

const SOURCE: &str = "hackernews";
const ITEM_PAGE: &str = "https://news.ycombinator.com/item";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Which story listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryKind {
    Top,
    New,
    Best,
    Ask,
    Show,
    Job,
}

impl StoryKind {
    fn endpoint(&self) -> &'static str {
        match self {
            StoryKind::Top => "topstories",
            StoryKind::New => "newstories",
            StoryKind::Best => "beststories",
            StoryKind::Ask => "askstories",
            StoryKind::Show => "showstories",
            StoryKind::Job => "jobstories",
        }
    }
}

/// One story, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HackerNewsResult {
    pub id: u64,
    pub title: String,
    /// External link, or the HN discussion page for self posts.
    pub url: String,
    pub snippet: Option<String>,
    pub points: u32,
    pub author: String,
    pub comments: u32,
    pub time: Option<DateTime<Utc>>,
}

/// Hacker News client over the Firebase v0 API.
pub struct HackerNews {
    base_url: String,
}

impl HackerNews {
    pub fn new() -> Self {
        Self::with_base_url("https://hacker-news.firebaseio.com/v0")
    }

    /// Point the client at a different endpoint (local test servers).
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into(),
        }
    }

    /// Fetch one story listing, resolving up to `limit` items concurrently.
    pub async fn stories(
        &self,
        client: &HttpClient,
        kind: StoryKind,
        limit: usize,
    ) -> Result<Vec<HackerNewsResult>> {
        let request = ProviderRequest::get(
            SOURCE,
            format!("{}/{}.json", self.base_url, kind.endpoint()),
        )
        .header("Accept", accept_json());
        let response = client.execute(request).await?;
        if !response.is_success() {
            return Err(fetch_error(response.status));
        }
        let ids: Vec<u64> = serde_json::from_str(&response.text).map_err(|_| malformed())?;

        let fetches = ids.into_iter().take(limit).map(|id| self.item(client, id));
        let mut results = Vec::new();
        for outcome in join_all(fetches).await {
            match outcome {
                Ok(Some(result)) => results.push(result),
                // A missing or dead item never sinks the whole listing.
                Ok(None) => {}
                Err(err) => debug!(error = %err, "skipping unfetchable item"),
            }
        }
        Ok(results)
    }

    /// Fetch one item by id. `None` for deleted or non-story items.
    pub async fn item(&self, client: &HttpClient, id: u64) -> Result<Option<HackerNewsResult>> {
        let request = ProviderRequest::get(SOURCE, format!("{}/item/{}.json", self.base_url, id))
            .header("Accept", accept_json());
        let response = client.execute(request).await?;
        if !response.is_success() {
            return Err(fetch_error(response.status));
        }
        parse_item(&response.text)
    }
}

impl Default for HackerNews {
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

fn parse_item(text: &str) -> Result<Option<HackerNewsResult>> {
    #[derive(Deserialize)]
    struct Item {
        id: u64,
        #[serde(default)]
        deleted: bool,
        #[serde(default)]
        dead: bool,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        score: u32,
        #[serde(default)]
        by: Option<String>,
        #[serde(default)]
        descendants: u32,
        #[serde(default)]
        time: i64,
    }

    // The API returns JSON `null` for unknown ids.
    let item: Option<Item> = serde_json::from_str(text).map_err(|_| malformed())?;
    let Some(item) = item else {
        return Ok(None);
    };
    if item.deleted || item.dead {
        return Ok(None);
    }
    let Some(title) = item.title else {
        return Ok(None);
    };

    let snippet = item.text.map(|t| {
        TAG_RE
            .replace_all(&t, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    });

    Ok(Some(HackerNewsResult {
        url: item
            .url
            .unwrap_or_else(|| format!("{ITEM_PAGE}?id={}", item.id)),
        id: item.id,
        title,
        snippet: snippet.filter(|s| !s.is_empty()),
        points: item.score,
        author: item.by.unwrap_or_default(),
        comments: item.descendants,
        time: DateTime::from_timestamp(item.time, 0),
    }))
}
