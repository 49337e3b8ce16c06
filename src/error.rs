//! Error taxonomy for the search core.
//!
//! Every failure that crosses the public `search` boundary is one of these
//! variants; raw transport errors from [`reqwest`] or parser internals are
//! classified at the adapter/orchestrator boundary and never leak through.
//! Each variant carries a stable machine-readable code for downstream
//! consumers that dispatch on error kind rather than message text.

use thiserror::Error;

/// Errors surfaced by search, suggestion and lookup operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The requested provider id is not present in the registry.
    #[error("unknown provider: {id}")]
    UnknownProvider { id: String },

    /// The provider exists but is administratively disabled.
    #[error("provider {id} is disabled (experimental: {experimental})")]
    ProviderDisabled { id: String, experimental: bool },

    /// Network or HTTP failure reaching a provider.
    #[error("fetch from {provider} failed: {message}")]
    Fetch { provider: String, message: String },

    /// A scraped payload was empty or unparseable.
    #[error("{provider} returned an empty or unparseable document")]
    MalformedHtml { provider: String },

    /// The overall call exceeded the caller-supplied timeout.
    #[error("search timed out after {ms} ms")]
    Timeout { ms: u64 },

    /// Both the primary and the fallback provider were exhausted.
    #[error("all providers failed; primary: {primary}; fallback: {fallback}")]
    AllProvidersFailed {
        primary: Box<SearchError>,
        fallback: Box<SearchError>,
    },
}

impl SearchError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownProvider { .. } => "UNKNOWN_PROVIDER",
            Self::ProviderDisabled { .. } => "PROVIDER_DISABLED",
            Self::Fetch { .. } => "PROVIDER_FETCH_ERROR",
            Self::MalformedHtml { .. } => "MALFORMED_HTML",
            Self::Timeout { .. } => "TIMEOUT",
            Self::AllProvidersFailed { .. } => "ALL_PROVIDERS_FAILED",
        }
    }

    /// Whether a retry of the same provider can plausibly succeed.
    ///
    /// Only transient transport and parse failures are retried; validation
    /// errors and timeouts are final for the current call.
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::MalformedHtml { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;
