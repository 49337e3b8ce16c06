//! Search orchestration: options, retry policy and the service itself.

pub mod models;
pub mod retry;
pub mod service;

pub use models::{QueryParams, SearchOptions, SearchResponse};
pub use retry::RetryPolicy;
pub use service::SearchService;
