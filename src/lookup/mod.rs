//! Single-site lookup collaborators with structured JSON APIs.
//!
//! These sit beside the scraping providers: same [`HttpClient`], their own
//! result types, no shared state with the search core.
//!
//! [`HttpClient`]: crate::network::HttpClient

pub mod hackernews;
pub mod wikipedia;

pub use hackernews::{HackerNews, HackerNewsResult, StoryKind};
pub use wikipedia::{Wikipedia, WikipediaResult};
