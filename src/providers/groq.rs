use crate::providers::instances::{ProviderAdapter, BaseAdapter, error_from_response};
use crate::providers::openai_compat::{ChatCompletionRequest, parse_chat_completion};
use crate::providers::types::{ProviderRequest, ProviderResponse, ProviderType};
use crate::rate_limit::RateLimitMetadata;
use crate::errors::ProviderResult;
use crate::constants;

use async_trait::async_trait;
use log::debug;
use reqwest::header;

/// Adapter for Groq's API
///
/// OpenAI-compatible chat completions with Bearer authentication.
/// Groq reports its quota window in `x-ratelimit-*` headers, which are
/// attached to every successful response.
pub struct GroqAdapter {
    base: BaseAdapter,
}

impl GroqAdapter {
    /// Creates a new Groq adapter
    ///
    /// # Parameters
    /// * `api_key` - Groq API key
    /// * `model` - Model to use (e.g., "llama-3.3-70b-versatile")
    /// * `endpoint` - Optional endpoint override
    /// * `enabled` - Whether this adapter is enabled
    pub fn new(api_key: String, model: String, endpoint: Option<String>, enabled: bool) -> Self {
        let base = BaseAdapter::new(ProviderType::Groq, api_key, model, endpoint, enabled);
        Self { base }
    }
}

#[async_trait]
impl ProviderAdapter for GroqAdapter {
    async fn call(&self, request: &ProviderRequest) -> ProviderResult<ProviderResponse> {
        self.base.ensure_enabled()?;
        let api_key = self.base.api_key()?;

        let body = ChatCompletionRequest::from_request(self.base.model(), request);

        let response = self
            .base
            .client()
            .post(self.base.endpoint_or(constants::GROQ_API_ENDPOINT))
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(ProviderType::Groq, response).await);
        }

        let rate_limits = RateLimitMetadata::from_groq_headers(response.headers());
        if rate_limits.is_none() {
            debug!("Groq response carried no usable rate-limit headers");
        }

        let text = response.text().await?;
        let parsed = parse_chat_completion(ProviderType::Groq, &text)?;

        Ok(ProviderResponse::new(
            parsed.content,
            parsed.model.unwrap_or_else(|| self.base.model().to_string()),
            parsed.usage,
        )
        .with_rate_limits(rate_limits))
    }

    fn provider(&self) -> ProviderType {
        self.base.provider()
    }

    fn model(&self) -> &str {
        self.base.model()
    }

    fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }
}
