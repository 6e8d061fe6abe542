//! Configuration types for TOML-based configuration.
//!
//! These types map directly to the TOML configuration file structure.

use serde::Deserialize;

use crate::constants;

/// Root configuration structure.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Orchestrator-wide settings.
    #[serde(default)]
    pub settings: Settings,

    /// Provider adapter configurations.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Orchestrator-wide settings.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Token fraction a provider must keep before it stops being preferred.
    #[serde(default = "default_reservation_fraction")]
    pub reservation_fraction: f64,

    /// Token fraction below which every provider counts as low for alerting.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,

    /// Minimum seconds between two capacity alerts.
    #[serde(default = "default_alert_cooldown_secs")]
    pub alert_cooldown_secs: u64,

    /// Tokens billed as one credit.
    #[serde(default = "default_tokens_per_credit")]
    pub tokens_per_credit: u64,

    /// Recipient of capacity alert emails.
    pub admin_email: Option<String>,

    /// Provider order used until an order is persisted in settings.
    pub default_priority: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reservation_fraction: default_reservation_fraction(),
            alert_threshold: default_alert_threshold(),
            alert_cooldown_secs: default_alert_cooldown_secs(),
            tokens_per_credit: default_tokens_per_credit(),
            admin_email: None,
            default_priority: None,
        }
    }
}

fn default_reservation_fraction() -> f64 {
    constants::DEFAULT_RESERVATION_FRACTION
}

fn default_alert_threshold() -> f64 {
    constants::DEFAULT_ALERT_THRESHOLD
}

fn default_alert_cooldown_secs() -> u64 {
    constants::DEFAULT_ALERT_COOLDOWN_SECS
}

fn default_tokens_per_credit() -> u64 {
    constants::DEFAULT_TOKENS_PER_CREDIT
}

/// Provider adapter configuration.
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "groq", "gemini", "deepseek" or "claude".
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Model identifier; empty selects the provider's default model.
    #[serde(default)]
    pub model: String,

    /// API key (supports environment variable syntax: "${VAR_NAME}").
    #[serde(default)]
    pub api_key: String,

    /// Whether this provider is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Custom endpoint URL (proxies, self-hosted gateways).
    pub endpoint: Option<String>,
}

fn default_true() -> bool {
    true
}
