use crate::providers::instances::{ProviderAdapter, BaseAdapter, error_from_response};
use crate::providers::types::{ProviderRequest, ProviderResponse, ProviderType, TokenUsage};
use crate::errors::{ProviderError, ProviderResult};
use crate::constants;

use async_trait::async_trait;
use reqwest::header;
use serde::{Serialize, Deserialize};

/// Adapter for Google's Gemini models
///
/// Gemini exposes no quota headers; token usage comes from `usageMetadata`.
pub struct GeminiAdapter {
    base: BaseAdapter,
}

/// Request structure for Gemini's generateContent API
#[derive(Serialize)]
struct GeminiGenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
struct GeminiGenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(rename = "modelVersion")]
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiUsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u64,
}

impl GeminiAdapter {
    pub fn new(api_key: String, model: String, endpoint: Option<String>, enabled: bool) -> Self {
        let base = BaseAdapter::new(ProviderType::Gemini, api_key, model, endpoint, enabled);
        Self { base }
    }

    fn build_request(request: &ProviderRequest) -> GeminiGenerateContentRequest {
        GeminiGenerateContentRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: request.prompt.clone() }],
            }],
            system_instruction: request.system.as_ref().map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system.clone() }],
            }),
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens.unwrap_or(constants::DEFAULT_MAX_TOKENS),
                response_mime_type: request.json_output.then_some("application/json"),
            },
        }
    }

    /// Extract text, usage and model version from a generateContent body
    fn parse_response(body: &str) -> ProviderResult<(String, Option<String>, TokenUsage)> {
        let response: GeminiGenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::Parse(format!("Gemini returned malformed JSON: {}", e)))?;

        let content: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect::<Vec<_>>().join(""))
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::Parse("No content in Gemini response".to_string()));
        }

        let usage = response
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok((content, response.model_version, usage))
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    async fn call(&self, request: &ProviderRequest) -> ProviderResult<ProviderResponse> {
        self.base.ensure_enabled()?;
        let api_key = self.base.api_key()?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base.endpoint_or(constants::GEMINI_API_ENDPOINT_PREFIX).trim_end_matches('/'),
            self.base.model()
        );

        let response = self
            .base
            .client()
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&Self::build_request(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(ProviderType::Gemini, response).await);
        }

        let text = response.text().await?;
        let (content, model, usage) = Self::parse_response(&text)?;

        Ok(ProviderResponse::new(
            content,
            model.unwrap_or_else(|| self.base.model().to_string()),
            usage,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]}}],
            "usageMetadata": {"promptTokenCount": 20, "candidatesTokenCount": 5, "totalTokenCount": 25},
            "modelVersion": "gemini-1.5-flash-002"
        }"#;
        let (content, model, usage) = GeminiAdapter::parse_response(body).unwrap();
        assert_eq!(content, "Hello, world");
        assert_eq!(model.as_deref(), Some("gemini-1.5-flash-002"));
        assert_eq!(usage, TokenUsage::new(20, 5));
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(GeminiAdapter::parse_response(body), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_build_request_shape() {
        let request = ProviderRequest::new("Outline", 0.2).system("Be brief").json_output(true).max_tokens(512);
        let body = serde_json::to_value(GeminiAdapter::build_request(&request)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }
}
