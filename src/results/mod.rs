//! Normalized result types shared by all providers.

use serde::{Deserialize, Serialize};

use crate::providers::ProviderId;

/// A single normalized search result.
///
/// Produced only by provider adapters (or the selector extractor on their
/// behalf) and immutable once constructed. Serialized field names are part
/// of the downstream contract: `title`, `url`, `snippet`, `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result, absolute where resolution was possible.
    pub url: String,
    /// Content snippet, when the provider supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// The provider that produced this result.
    pub source: ProviderId,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: ProviderId) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: None,
            source,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}
