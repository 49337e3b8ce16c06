//! Request and response models for the search service.

use serde::{Deserialize, Serialize};

use crate::providers::ProviderId;
use crate::results::SearchResult;

/// Caller-facing knobs for one search call. Unset fields fall back to the
/// configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of results to return.
    pub limit: Option<usize>,
    /// Safe-search filtering.
    pub safe_search: Option<bool>,
    /// Overall deadline for the call, in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Pin the call to one provider instead of the default chain.
    pub provider: Option<ProviderId>,
}

impl SearchOptions {
    pub fn with_provider(provider: ProviderId) -> Self {
        Self {
            provider: Some(provider),
            ..Self::default()
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Fully resolved query parameters handed to adapters. All defaulting has
/// happened by the time one of these exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub query: String,
    pub limit: usize,
    pub safe_search: bool,
}

impl QueryParams {
    pub fn new(query: impl Into<String>, limit: usize, safe_search: bool) -> Self {
        Self {
            query: query.into(),
            limit,
            safe_search,
        }
    }
}

/// The outcome of a successful search call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    /// Provider that actually produced the results (after any fallback).
    pub source: ProviderId,
    /// Whether the results came from the cache.
    pub cached: bool,
}
