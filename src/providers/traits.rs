//! The adapter trait every provider implements.

use async_trait::async_trait;

use super::ProviderId;
use crate::error::{Result, SearchError};
use crate::network::{HttpClient, ProviderRequest, ProviderResponse};
use crate::results::SearchResult;
use crate::search::QueryParams;

/// One search backend.
///
/// Adapters are stateless request/parse pairs: `request` describes the
/// outgoing call for a query, `parse` turns the raw response into
/// normalized results. The provided `fetch` composes the two through the
/// shared [`HttpClient`]; rate limiting, retry and caching are the
/// orchestrator's business, never the adapter's.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Build the outgoing request for a query.
    fn request(&self, params: &QueryParams) -> ProviderRequest;

    /// Parse a raw response into results. An empty vec is a valid outcome.
    fn parse(&self, response: ProviderResponse) -> Result<Vec<SearchResult>>;

    /// One complete network round trip for a query.
    async fn fetch(&self, client: &HttpClient, params: &QueryParams) -> Result<Vec<SearchResult>> {
        let response = client.execute(self.request(params)).await?;
        if !response.is_success() {
            return Err(SearchError::Fetch {
                provider: self.id().to_string(),
                message: format!("HTTP status {}", response.status),
            });
        }
        self.parse(response)
    }
}
