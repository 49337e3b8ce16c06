//! Configuration loading and defaults.

pub mod settings;

pub use settings::{
    OutgoingSettings, ProviderSettings, RetrySettings, SearchSettings, Settings,
};
