//! HTTP client for making requests to search providers.

use super::user_agent::{accept_html, accept_language, random_user_agent};
use super::{HttpMethod, ProviderRequest, ProviderResponse, RequestBody};
use crate::config::OutgoingSettings;
use crate::error::SearchError;
use anyhow::Result;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client wrapper shared by all providers.
///
/// Construction failures are configuration errors and use `anyhow`;
/// once built, `execute` speaks the crate's [`SearchError`] taxonomy so
/// transport failures surface as `PROVIDER_FETCH_ERROR` with the owning
/// provider attached.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings.
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings.
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: random_user_agent().to_string(),
        })
    }

    /// Execute a provider request.
    pub async fn execute(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, SearchError> {
        let source = request.source.clone();
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_html())
            .header("Accept-Language", accept_language("en"))
            .header("DNT", "1")
            .header("Connection", "keep-alive")
            .header("Upgrade-Insecure-Requests", "1");

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(body) = request.data {
            req_builder = match body {
                RequestBody::Form(data) => req_builder.form(&data),
                RequestBody::Json(json) => req_builder.json(&json),
            };
        }

        let response = req_builder.send().await.map_err(|e| SearchError::Fetch {
            provider: source.clone(),
            message: e.to_string(),
        })?;

        Self::parse_response(response, &source).await
    }

    async fn parse_response(
        response: Response,
        source: &str,
    ) -> std::result::Result<ProviderResponse, SearchError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let text = response.text().await.map_err(|e| SearchError::Fetch {
            provider: source.to_string(),
            message: e.to_string(),
        })?;

        Ok(ProviderResponse {
            status,
            headers,
            text,
            url,
        })
    }

    /// Get current user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Pick a fresh user agent for subsequent requests.
    pub fn rotate_user_agent(&mut self) {
        self.user_agent = random_user_agent().to_string();
    }
}
