//! Label helpers for consistent metric labeling

use crate::errors::ProviderError;
use crate::ProviderType;

/// Standard label keys
pub mod keys {
    /// Provider name label key
    pub const PROVIDER: &str = "provider";
    /// Model name label key
    pub const MODEL: &str = "model";
    /// Task name label key
    pub const TASK: &str = "task";
    /// Error type label key
    pub const ERROR_TYPE: &str = "error_type";
}

/// Convert ProviderType to label value string
pub fn provider_label(provider: ProviderType) -> &'static str {
    provider.id()
}

/// Convert ProviderError to error type label string
pub fn error_type_label(error: &ProviderError) -> &'static str {
    match error {
        ProviderError::Request(_) => "request_error",
        ProviderError::Api(_) => "api_error",
        ProviderError::Auth(_) => "auth_error",
        ProviderError::RateLimit(_) => "rate_limit",
        ProviderError::Parse(_) => "parse_error",
        ProviderError::Disabled(_) => "provider_disabled",
        ProviderError::Config(_) => "config_error",
    }
}
