use std::error::Error;
use std::fmt;

use crate::providers::ProviderType;

/// Failure of a single provider adapter call
#[derive(Debug)]
pub enum ProviderError {
    /// Transport-level failure from the HTTP client
    Request(reqwest::Error),
    /// Non-success response from the provider API
    Api(String),
    /// Missing, invalid or rejected credentials
    Auth(String),
    /// Provider-side rate limiting
    RateLimit(String),
    /// Malformed or empty provider response
    Parse(String),
    /// Provider is disabled or has no adapter registered
    Disabled(String),
    /// Adapter misconfiguration
    Config(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Request(err) => write!(f, "Request error: {}", err),
            ProviderError::Api(msg) => write!(f, "API error: {}", msg),
            ProviderError::Auth(msg) => write!(f, "Authentication error: {}", msg),
            ProviderError::RateLimit(msg) => write!(f, "Rate limit error: {}", msg),
            ProviderError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ProviderError::Disabled(provider) => write!(f, "Provider disabled: {}", provider),
            ProviderError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProviderError::Request(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Request(err)
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    /// Classify a non-success API response.
    ///
    /// 429 and rate-limit wording map to `RateLimit`, 401/403 to `Auth`,
    /// everything else to `Api`.
    pub fn from_api_response(status: reqwest::StatusCode, error_message: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return ProviderError::RateLimit(error_message);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return ProviderError::Auth(error_message);
        }

        let msg_lower = error_message.to_lowercase();
        if msg_lower.contains("rate limit")
            || msg_lower.contains("too many requests")
            || msg_lower.contains("quota exceeded")
            || msg_lower.contains("resource_exhausted")
            || msg_lower.contains("overloaded") {
            return ProviderError::RateLimit(error_message);
        }

        ProviderError::Api(error_message)
    }
}

/// Failure of an external collaborator (settings, usage log, balances, notifications)
#[derive(Debug)]
pub enum StoreError {
    /// Store cannot be reached or is not provisioned yet
    Unavailable(String),
    /// Requested record does not exist
    NotFound(String),
    /// Stored value could not be (de)serialized
    Serialization(String),
    /// Filesystem failure
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            StoreError::NotFound(what) => write!(f, "Not found: {}", what),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that cross the orchestrator boundary
#[derive(Debug)]
pub enum OrchestratorError {
    /// Pre-flight balance check failed; no provider was contacted
    QuotaExhausted {
        user_id: String,
        used: u64,
        anticipated: u64,
        limit: u64,
    },
    /// Every candidate provider was tried and failed
    AllProvidersFailed {
        failures: Vec<(ProviderType, String)>,
    },
    /// Invalid configuration or admin input
    Config(String),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestratorError::QuotaExhausted { user_id, used, anticipated, limit } => write!(
                f,
                "Quota exhausted for user {}: {} used + {} requested exceeds limit of {}",
                user_id, used, anticipated, limit
            ),
            OrchestratorError::AllProvidersFailed { failures } => {
                if failures.is_empty() {
                    return write!(f, "All AI providers failed: no provider was available");
                }
                let details: Vec<String> = failures
                    .iter()
                    .map(|(provider, reason)| format!("{}: {}", provider, reason))
                    .collect();
                write!(f, "All AI providers failed. {}", details.join(" | "))
            }
            OrchestratorError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for OrchestratorError {}

impl From<std::io::Error> for OrchestratorError {
    fn from(err: std::io::Error) -> Self {
        OrchestratorError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for OrchestratorError {
    fn from(err: toml::de::Error) -> Self {
        OrchestratorError::Config(format!("Failed to parse TOML: {}", err))
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

impl OrchestratorError {
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, OrchestratorError::QuotaExhausted { .. })
    }

    pub fn is_all_providers_failed(&self) -> bool {
        matches!(self, OrchestratorError::AllProvidersFailed { .. })
    }
}
