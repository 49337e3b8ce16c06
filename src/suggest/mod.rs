//! Query autocomplete from provider suggestion endpoints.
//!
//! Each provider speaks its own JSON shape; parsing is strict per provider
//! and kept in separable functions so fixtures can exercise them without a
//! network.

use serde::Deserialize;

use crate::error::{Result, SearchError};
use crate::network::user_agent::accept_json;
use crate::network::{HttpClient, ProviderRequest};
use crate::providers::ProviderId;

/// One completion for a partial query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub phrase: String,
}

/// Fetch suggestions for a partial query from one provider's autocomplete
/// endpoint.
pub async fn suggest(
    client: &HttpClient,
    provider: ProviderId,
    query: &str,
) -> Result<Vec<Suggestion>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let request = build_request(provider, query);
    let response = client.execute(request).await?;
    if !response.is_success() {
        return Err(SearchError::Fetch {
            provider: provider.to_string(),
            message: format!("HTTP status {}", response.status),
        });
    }

    match provider {
        ProviderId::DuckDuckGo => parse_duckduckgo(&response.text),
        ProviderId::Google | ProviderId::Brave => parse_opensearch(&response.text, provider),
        ProviderId::Ecosia => parse_ecosia(&response.text),
    }
}

fn build_request(provider: ProviderId, query: &str) -> ProviderRequest {
    let source = provider.as_str();
    let request = match provider {
        ProviderId::DuckDuckGo => ProviderRequest::get(source, "https://duckduckgo.com/ac/"),
        ProviderId::Google => {
            ProviderRequest::get(source, "https://suggestqueries.google.com/complete/search")
                .param("client", "firefox")
        }
        ProviderId::Brave => ProviderRequest::get(source, "https://search.brave.com/api/suggest"),
        ProviderId::Ecosia => ProviderRequest::get(source, "https://ac.ecosia.org/"),
    };
    request.param("q", query).header("Accept", accept_json())
}

/// DuckDuckGo: `[{"phrase": "..."}]`
fn parse_duckduckgo(text: &str) -> Result<Vec<Suggestion>> {
    #[derive(Deserialize)]
    struct Entry {
        phrase: String,
    }
    let entries: Vec<Entry> = parse_json(text, ProviderId::DuckDuckGo)?;
    Ok(entries
        .into_iter()
        .map(|e| Suggestion { phrase: e.phrase })
        .collect())
}

/// Google and Brave: OpenSearch style `["query", ["a", "b", ...]]`
fn parse_opensearch(text: &str, provider: ProviderId) -> Result<Vec<Suggestion>> {
    let (_echo, phrases): (String, Vec<String>) = parse_json(text, provider)?;
    Ok(phrases.into_iter().map(|phrase| Suggestion { phrase }).collect())
}

/// Ecosia: `{"query": "...", "suggestions": ["a", "b", ...]}`
fn parse_ecosia(text: &str) -> Result<Vec<Suggestion>> {
    #[derive(Deserialize)]
    struct Payload {
        suggestions: Vec<String>,
    }
    let payload: Payload = parse_json(text, ProviderId::Ecosia)?;
    Ok(payload
        .suggestions
        .into_iter()
        .map(|phrase| Suggestion { phrase })
        .collect())
}

fn parse_json<'a, T: Deserialize<'a>>(text: &'a str, provider: ProviderId) -> Result<T> {
    serde_json::from_str(text).map_err(|_| SearchError::MalformedHtml {
        provider: provider.to_string(),
    })
}
