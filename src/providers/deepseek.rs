use crate::providers::instances::{ProviderAdapter, BaseAdapter, error_from_response};
use crate::providers::openai_compat::{ChatCompletionRequest, parse_chat_completion};
use crate::providers::types::{ProviderRequest, ProviderResponse, ProviderType};
use crate::errors::ProviderResult;
use crate::constants;

use async_trait::async_trait;
use reqwest::header;

/// Adapter for DeepSeek's API
///
/// OpenAI-compatible. DeepSeek does not publish quota headers, so the
/// tracker never learns constraints for it and treats it as always healthy.
pub struct DeepSeekAdapter {
    base: BaseAdapter,
}

impl DeepSeekAdapter {
    pub fn new(api_key: String, model: String, endpoint: Option<String>, enabled: bool) -> Self {
        let base = BaseAdapter::new(ProviderType::DeepSeek, api_key, model, endpoint, enabled);
        Self { base }
    }
}

#[async_trait]
impl ProviderAdapter for DeepSeekAdapter {
    async fn call(&self, request: &ProviderRequest) -> ProviderResult<ProviderResponse> {
        self.base.ensure_enabled()?;
        let api_key = self.base.api_key()?;

        let body = ChatCompletionRequest::from_request(self.base.model(), request);

        let response = self
            .base
            .client()
            .post(self.base.endpoint_or(constants::DEEPSEEK_API_ENDPOINT))
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(ProviderType::DeepSeek, response).await);
        }

        let text = response.text().await?;
        let parsed = parse_chat_completion(ProviderType::DeepSeek, &text)?;

        Ok(ProviderResponse::new(
            parsed.content,
            parsed.model.unwrap_or_else(|| self.base.model().to_string()),
            parsed.usage,
        ))
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
