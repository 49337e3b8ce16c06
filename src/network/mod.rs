//! Outgoing HTTP: client wrapper, request/response types, user agents.

pub mod client;
pub mod user_agent;

pub use client::HttpClient;

use std::collections::HashMap;

/// HTTP method for provider requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request body variants.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Form(HashMap<String, String>),
    Json(serde_json::Value),
}

/// A fully described outgoing request, built by a provider adapter and
/// executed by [`HttpClient`]. `source` names the caller for error
/// attribution; it never reaches the wire.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub source: String,
    pub method: HttpMethod,
    pub url: String,
    pub params: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub data: Option<RequestBody>,
}

impl ProviderRequest {
    pub fn get(source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            method: HttpMethod::Get,
            url: url.into(),
            params: HashMap::new(),
            headers: HashMap::new(),
            data: None,
        }
    }

    pub fn post(source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(source, url)
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.data = Some(RequestBody::Form(data));
        self
    }

    pub fn json(mut self, json: serde_json::Value) -> Self {
        self.data = Some(RequestBody::Json(json));
        self
    }
}

/// The response handed back to the adapter's parser.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub text: String,
    pub url: String,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
