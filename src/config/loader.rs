//! Configuration file loading and environment variable resolution.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::types::{Config, ProviderConfig};
use crate::errors::{OrchestratorError, OrchestratorResult};
use crate::providers::ProviderType;

/// Load and parse a TOML configuration file.
///
/// # Example
/// ```no_run
/// use seoaaa_orchestrator::config::load_config;
///
/// let config = load_config("orchestrator.toml").unwrap();
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> OrchestratorResult<Config> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        OrchestratorError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
    })?;

    parse_config(&content)
}

/// Parse a TOML configuration string, resolving `${VAR}` references and
/// validating the result.
pub fn parse_config(content: &str) -> OrchestratorResult<Config> {
    let mut config: Config = toml::from_str(content)?;

    resolve_env_vars(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

/// Resolve environment variable references in the configuration.
fn resolve_env_vars(config: &mut Config) -> OrchestratorResult<()> {
    for (idx, provider) in config.providers.iter_mut().enumerate() {
        provider.api_key = resolve_env_var_string(&provider.api_key, &format!("providers[{}].api_key", idx))?;

        if let Some(endpoint) = provider.endpoint.take() {
            provider.endpoint = Some(resolve_env_var_string(&endpoint, &format!("providers[{}].endpoint", idx))?);
        }
    }

    if let Some(email) = config.settings.admin_email.take() {
        config.settings.admin_email = Some(resolve_env_var_string(&email, "settings.admin_email")?);
    }

    Ok(())
}

/// Replace every `${VAR}` in `s`; a missing variable is an error naming `field`.
fn resolve_env_var_string(s: &str, field: &str) -> OrchestratorResult<String> {
    let pattern = env_var_pattern();
    let mut result = s.to_string();

    for caps in pattern.captures_iter(s) {
        let (full_match, [var_name]) = caps.extract();
        match env::var(var_name) {
            Ok(value) => result = result.replace(full_match, &value),
            Err(_) => {
                return Err(OrchestratorError::Config(format!(
                    "Environment variable '{}' not found\n  \
                     → Referenced in {}\n  \
                     → Set it with: export {}=\"your-value\"",
                    var_name, field, var_name
                )));
            }
        }
    }

    Ok(result)
}

/// Validate the configuration for consistency.
fn validate_config(config: &Config) -> OrchestratorResult<()> {
    let valid_providers: Vec<&str> = ProviderType::ALL.iter().map(|p| p.id()).collect();
    let mut seen = HashSet::new();

    for (idx, provider) in config.providers.iter().enumerate() {
        let provider_type: ProviderType = provider.provider_type.parse().map_err(|_| {
            OrchestratorError::Config(format!(
                "Unknown provider type '{}' in providers[{}]\n  \
                 → Valid types: {}",
                provider.provider_type,
                idx,
                valid_providers.join(", ")
            ))
        })?;

        if !seen.insert(provider_type) {
            return Err(OrchestratorError::Config(format!(
                "Provider '{}' is configured more than once\n  \
                 → Remove the duplicate entry at providers[{}]",
                display_name(provider),
                idx
            )));
        }
    }

    let settings = &config.settings;
    for (name, value) in [
        ("reservation_fraction", settings.reservation_fraction),
        ("alert_threshold", settings.alert_threshold),
    ] {
        if !(value > 0.0 && value < 1.0) {
            return Err(OrchestratorError::Config(format!(
                "settings.{} must be between 0 and 1 (exclusive), got {}",
                name, value
            )));
        }
    }

    if settings.tokens_per_credit == 0 {
        return Err(OrchestratorError::Config("settings.tokens_per_credit must be greater than zero".to_string()));
    }

    if let Some(order) = &settings.default_priority {
        let mut seen_in_order = HashSet::new();
        for id in order {
            let provider = id.parse::<ProviderType>().map_err(|_| {
                OrchestratorError::Config(format!(
                    "Unknown provider '{}' in settings.default_priority\n  \
                     → Valid types: {}",
                    id,
                    valid_providers.join(", ")
                ))
            })?;
            if !seen_in_order.insert(provider) {
                return Err(OrchestratorError::Config(format!(
                    "Provider '{}' appears more than once in settings.default_priority",
                    id
                )));
            }
        }
    }

    Ok(())
}

fn display_name(provider: &ProviderConfig) -> String {
    if provider.model.is_empty() {
        provider.provider_type.clone()
    } else {
        format!("{}/{}", provider.provider_type, provider.model)
    }
}
