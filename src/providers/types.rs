use serde::{Serialize, Deserialize};
use std::str::FromStr;

use crate::constants;
use crate::rate_limit::RateLimitMetadata;

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Groq,
    Gemini,
    DeepSeek,
    Claude,
}

impl ProviderType {
    pub const ALL: [ProviderType; 4] = [
        ProviderType::Groq,
        ProviderType::Gemini,
        ProviderType::DeepSeek,
        ProviderType::Claude,
    ];

    /// Lowercase identifier used in settings, config files and logs
    pub fn id(&self) -> &'static str {
        match self {
            ProviderType::Groq => "groq",
            ProviderType::Gemini => "gemini",
            ProviderType::DeepSeek => "deepseek",
            ProviderType::Claude => "claude",
        }
    }

    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderType::Groq => constants::GROQ_DEFAULT_MODEL,
            ProviderType::Gemini => constants::GEMINI_DEFAULT_MODEL,
            ProviderType::DeepSeek => constants::DEEPSEEK_DEFAULT_MODEL,
            ProviderType::Claude => constants::CLAUDE_DEFAULT_MODEL,
        }
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(ProviderType::Groq),
            "gemini" | "google" => Ok(ProviderType::Gemini),
            "deepseek" => Ok(ProviderType::DeepSeek),
            "claude" | "anthropic" => Ok(ProviderType::Claude),
            other => Err(format!("Unknown provider '{}'", other)),
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::Groq => write!(f, "Groq"),
            ProviderType::Gemini => write!(f, "Gemini"),
            ProviderType::DeepSeek => write!(f, "DeepSeek"),
            ProviderType::Claude => write!(f, "Claude"),
        }
    }
}

/// A single generation call handed to an adapter
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Ask the provider for a JSON object instead of free text
    pub json_output: bool,
}

impl ProviderRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            temperature,
            max_tokens: None,
            json_output: false,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn json_output(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self { input_tokens, output_tokens }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// What an adapter returns on success
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
    /// Quota window reported by the provider, when it exposes one
    pub rate_limits: Option<RateLimitMetadata>,
}

impl ProviderResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage,
            rate_limits: None,
        }
    }

    pub fn with_rate_limits(mut self, metadata: Option<RateLimitMetadata>) -> Self {
        self.rate_limits = metadata;
        self
    }
}
