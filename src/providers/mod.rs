/// LLM backends behind a uniform adapter contract
///
/// - Groq (OpenAI-compatible, reports quota headers)
/// - Gemini (Google generateContent)
/// - DeepSeek (OpenAI-compatible)
/// - Claude (Anthropic Messages API, reports quota headers)
///
/// The `ProviderRegistry` maps each provider id to its adapter so the
/// orchestrator never branches on provider names.

pub mod types;
pub mod instances;
pub mod registry;
pub mod groq;
pub mod gemini;
pub mod deepseek;
pub mod claude;
mod openai_compat;

pub use types::{ProviderType, ProviderRequest, ProviderResponse, TokenUsage};
pub use instances::{ProviderAdapter, BaseAdapter};
pub use registry::{ProviderRegistry, SharedAdapter, create_adapter};
pub use groq::GroqAdapter;
pub use gemini::GeminiAdapter;
pub use deepseek::DeepSeekAdapter;
pub use claude::ClaudeAdapter;
