use crate::providers::ProviderType;

// Health and alerting
pub const DEFAULT_RESERVATION_FRACTION: f64 = 0.4;
pub const DEFAULT_ALERT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_ALERT_COOLDOWN_SECS: u64 = 3600;
/// Used when a provider's reset signal is missing or malformed
pub const FALLBACK_RESET_SECS: i64 = 60;

// Billing
pub const DEFAULT_TOKENS_PER_CREDIT: u64 = 1000;

// Settings keys
pub const PRIORITY_SETTINGS_KEY: &str = "ai_model_priority";

pub const DEFAULT_PRIORITY: [ProviderType; 4] = [
    ProviderType::Groq,
    ProviderType::Gemini,
    ProviderType::DeepSeek,
    ProviderType::Claude,
];

// HTTP
pub const REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

// Groq
pub const GROQ_API_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

// Gemini
pub const GEMINI_API_ENDPOINT_PREFIX: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";

// DeepSeek
pub const DEEPSEEK_API_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

// Claude
pub const CLAUDE_API_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const CLAUDE_API_VERSION: &str = "2023-06-01";
pub const CLAUDE_DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

// Placeholder returned by generation tasks when every provider failed
pub const PLACEHOLDER_CONTENT: &str = "Content generation is temporarily unavailable. All AI providers failed to respond; please try again in a few minutes.";
