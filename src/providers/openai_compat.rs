//! Wire types shared by the OpenAI-compatible chat completion APIs (Groq, DeepSeek).

use serde::{Serialize, Deserialize};

use crate::errors::{ProviderError, ProviderResult};
use crate::providers::types::{ProviderRequest, ProviderType, TokenUsage};
use crate::constants;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: &'static str,
}

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    pub stream: bool,
}

impl ChatCompletionRequest {
    pub fn from_request(model: &str, request: &ProviderRequest) -> Self {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(ChatMessage { role: "system".to_string(), content: system.clone() });
        }
        messages.push(ChatMessage { role: "user".to_string(), content: request.prompt.clone() });

        Self {
            model: model.to_string(),
            messages,
            max_tokens: request.max_tokens.unwrap_or(constants::DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
            response_format: request.json_output.then_some(ResponseFormat { format_type: "json_object" }),
            stream: false,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    model: Option<String>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

/// Parsed chat completion: content, model, usage
pub(crate) struct ParsedCompletion {
    pub content: String,
    pub model: Option<String>,
    pub usage: TokenUsage,
}

/// Parse a chat completion body, rejecting empty content
pub(crate) fn parse_chat_completion(provider: ProviderType, body: &str) -> ProviderResult<ParsedCompletion> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Parse(format!("{} returned malformed JSON: {}", provider, e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ProviderError::Parse(format!("No content in {} response", provider)))?;

    let usage = response
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(ParsedCompletion { content, model: response.model, usage })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_completion() {
        let body = r#"{
            "model": "llama-3.3-70b-versatile",
            "choices": [{"message": {"role": "assistant", "content": "Hello"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;
        let parsed = parse_chat_completion(ProviderType::Groq, body).unwrap();
        assert_eq!(parsed.content, "Hello");
        assert_eq!(parsed.model.as_deref(), Some("llama-3.3-70b-versatile"));
        assert_eq!(parsed.usage, TokenUsage::new(12, 3));
    }

    #[test]
    fn test_empty_choices_is_error() {
        let body = r#"{"model": "deepseek-chat", "choices": []}"#;
        let err = parse_chat_completion(ProviderType::DeepSeek, body).err().unwrap();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_blank_content_is_error() {
        let body = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        assert!(parse_chat_completion(ProviderType::Groq, body).is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_chat_completion(ProviderType::Groq, "<html>").err().unwrap();
        assert!(err.to_string().contains("malformed JSON"));
    }

    #[test]
    fn test_request_includes_json_format_and_system() {
        let request = ProviderRequest::new("Write", 0.3).system("You are an SEO expert").json_output(true);
        let body = serde_json::to_value(ChatCompletionRequest::from_request("m", &request)).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Write");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["max_tokens"], constants::DEFAULT_MAX_TOKENS);
    }
}
