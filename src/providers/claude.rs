use crate::providers::instances::{ProviderAdapter, BaseAdapter, error_from_response};
use crate::providers::types::{ProviderRequest, ProviderResponse, ProviderType, TokenUsage};
use crate::rate_limit::RateLimitMetadata;
use crate::errors::{ProviderError, ProviderResult};
use crate::constants;

use async_trait::async_trait;
use reqwest::header;
use serde::{Serialize, Deserialize};

const JSON_INSTRUCTION: &str = "Respond with a single valid JSON object and nothing else.";

/// Adapter for Anthropic's Claude models (Messages API)
///
/// Reports `anthropic-ratelimit-*` headers as quota metadata.
pub struct ClaudeAdapter {
    base: BaseAdapter,
}

#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ClaudeMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ClaudeContent>,
    model: Option<String>,
    usage: Option<ClaudeUsage>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ClaudeUsage {
    input_tokens: u64,
    output_tokens: u64,
}

impl ClaudeAdapter {
    pub fn new(api_key: String, model: String, endpoint: Option<String>, enabled: bool) -> Self {
        let base = BaseAdapter::new(ProviderType::Claude, api_key, model, endpoint, enabled);
        Self { base }
    }

    fn build_request(model: &str, request: &ProviderRequest) -> ClaudeRequest {
        // No native JSON mode; ask for it in the system prompt instead.
        let system = match (&request.system, request.json_output) {
            (Some(system), true) => Some(format!("{}\n\n{}", system, JSON_INSTRUCTION)),
            (None, true) => Some(JSON_INSTRUCTION.to_string()),
            (system, false) => system.clone(),
        };

        ClaudeRequest {
            model: model.to_string(),
            system,
            messages: vec![ClaudeMessage { role: "user".to_string(), content: request.prompt.clone() }],
            max_tokens: request.max_tokens.unwrap_or(constants::DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
        }
    }

    fn parse_response(body: &str) -> ProviderResult<(String, Option<String>, TokenUsage)> {
        let response: ClaudeResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::Parse(format!("Claude returned malformed JSON: {}", e)))?;

        let content: String = response
            .content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if content.trim().is_empty() {
            return Err(ProviderError::Parse("No text content in Claude response".to_string()));
        }

        let usage = response
            .usage
            .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens))
            .unwrap_or_default();

        Ok((content, response.model, usage))
    }
}

#[async_trait]
impl ProviderAdapter for ClaudeAdapter {
    async fn call(&self, request: &ProviderRequest) -> ProviderResult<ProviderResponse> {
        self.base.ensure_enabled()?;
        let api_key = self.base.api_key()?;

        let response = self
            .base
            .client()
            .post(self.base.endpoint_or(constants::CLAUDE_API_ENDPOINT))
            .header("x-api-key", api_key)
            .header("anthropic-version", constants::CLAUDE_API_VERSION)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&Self::build_request(self.base.model(), request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(ProviderType::Claude, response).await);
        }

        let rate_limits = RateLimitMetadata::from_anthropic_headers(response.headers());
        let text = response.text().await?;
        let (content, model, usage) = Self::parse_response(&text)?;

        Ok(ProviderResponse::new(
            content,
            model.unwrap_or_else(|| self.base.model().to_string()),
            usage,
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
