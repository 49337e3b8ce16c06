//! Multi-provider web search orchestration.
//!
//! One logical query fans out to scraped search frontends and JSON
//! endpoints through a single pipeline: provider registry, per-provider
//! rate limiting, TTL result caching, retried dispatch and one
//! cross-provider fallback.
//!
//! ```no_run
//! use omnisearch::config::Settings;
//! use omnisearch::search::{SearchOptions, SearchService};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let service = SearchService::new(Settings::default())?;
//! let response = service.search("rust async runtime", &SearchOptions::default()).await?;
//! for result in &response.results {
//!     println!("{} — {}", result.title, result.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod html;
pub mod lookup;
pub mod network;
pub mod providers;
pub mod ratelimit;
pub mod results;
pub mod search;
pub mod suggest;

pub use error::{Result, SearchError};
pub use providers::ProviderId;
pub use results::SearchResult;
pub use search::{SearchOptions, SearchResponse, SearchService};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default overall deadline for one search call.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default maximum number of results per call.
pub const DEFAULT_LIMIT: usize = 10;
