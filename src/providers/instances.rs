use crate::constants;
use crate::errors::{ProviderError, ProviderResult};
use crate::providers::types::{ProviderRequest, ProviderResponse, ProviderType};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Common interface for all LLM backends
///
/// Each backend turns a `ProviderRequest` into generated text plus token
/// usage. Failures must be typed errors, never empty content. Backends that
/// expose quota headers attach them as `ProviderResponse::rate_limits` so the
/// orchestrator can feed its `RateTracker`.
#[async_trait]
pub trait ProviderAdapter {
    /// Run one generation call against the provider
    async fn call(&self, request: &ProviderRequest) -> ProviderResult<ProviderResponse>;
    /// Which backend this adapter talks to
    fn provider(&self) -> ProviderType;
    /// Configured model name
    fn model(&self) -> &str;
    /// Whether this adapter may be called
    fn is_enabled(&self) -> bool;
}

/// Shared state for HTTP adapters
///
/// Handles:
/// - HTTP client with timeout
/// - API key storage
/// - Model selection
/// - Endpoint override
/// - Enable/disable status
pub struct BaseAdapter {
    provider: ProviderType,
    client: Client,
    api_key: String,
    model: String,
    endpoint: Option<String>,
    enabled: bool,
}

impl BaseAdapter {
    /// Create a new BaseAdapter
    ///
    /// # Parameters
    /// * `provider` - Backend identifier
    /// * `api_key` - API key for authentication
    /// * `model` - Model identifier to use
    /// * `endpoint` - Optional endpoint override
    /// * `enabled` - Whether this adapter is enabled
    pub fn new(provider: ProviderType, api_key: String, model: String, endpoint: Option<String>, enabled: bool) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(constants::REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build HTTP client with timeout for {}: {}. Using defaults.", provider, e);
                Client::new()
            });

        let model = if model.trim().is_empty() { provider.default_model().to_string() } else { model };

        Self { provider, client, api_key, model, endpoint, enabled }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// API key, or an `Auth` error if none is configured
    pub fn api_key(&self) -> ProviderResult<&str> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Auth(format!("{} API key is not configured", self.provider)));
        }
        Ok(&self.api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> ProviderType {
        self.provider
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Endpoint override, or the given default
    pub fn endpoint_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.endpoint.as_deref().unwrap_or(default)
    }

    /// Fails with `Disabled` when the adapter is switched off
    pub fn ensure_enabled(&self) -> ProviderResult<()> {
        if !self.enabled {
            return Err(ProviderError::Disabled(self.provider.to_string()));
        }
        Ok(())
    }
}

/// Read a non-success response body and classify it
pub(crate) async fn error_from_response(provider: ProviderType, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| format!("Unknown error. Status: {}", status));
    ProviderError::from_api_response(status, format!("{} API error ({}): {}", provider, status.as_u16(), body))
}
