//! Search providers: identifiers, configuration, registry and adapters.

pub mod brave;
pub mod duckduckgo;
pub mod ecosia;
pub mod google;
pub mod registry;
pub mod traits;

pub use registry::{ProviderConfig, ProviderRegistry};
pub use traits::ProviderAdapter;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Closed set of supported search providers.
///
/// Adding a provider means adding a variant and an adapter, never passing a
/// free-form string through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Google,
    Brave,
    DuckDuckGo,
    Ecosia,
}

impl ProviderId {
    /// All known providers, in registry order.
    pub const ALL: [ProviderId; 4] = [
        ProviderId::DuckDuckGo,
        ProviderId::Google,
        ProviderId::Brave,
        ProviderId::Ecosia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Google => "google",
            ProviderId::Brave => "brave",
            ProviderId::DuckDuckGo => "duckduckgo",
            ProviderId::Ecosia => "ecosia",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(ProviderId::Google),
            "brave" => Ok(ProviderId::Brave),
            "duckduckgo" => Ok(ProviderId::DuckDuckGo),
            "ecosia" => Ok(ProviderId::Ecosia),
            other => Err(SearchError::UnknownProvider { id: other.to_string() }),
        }
    }
}
