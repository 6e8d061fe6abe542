//! Tests for TOML configuration loading and parsing.

use std::env;
use std::io::Write;

use seoaaa_orchestrator::config::{load_config, parse_config};
use seoaaa_orchestrator::{OrchestratorBuilder, ProviderType};
use tempfile::NamedTempFile;

// ============================================================================
// TOML Parsing Tests
// ============================================================================

#[test]
fn test_parse_full_config() {
    let toml = r#"
[settings]
reservation_fraction = 0.25
alert_threshold = 0.2
alert_cooldown_secs = 600
tokens_per_credit = 500
admin_email = "ops@example.com"
default_priority = ["claude", "groq", "gemini"]

[[providers]]
type = "groq"
model = "llama-3.3-70b-versatile"
api_key = "groq-key"

[[providers]]
type = "claude"
model = "claude-3-5-sonnet-latest"
api_key = "claude-key"
endpoint = "http://localhost:9000/v1/messages"
enabled = false
"#;

    let config = parse_config(toml).unwrap();
    assert_eq!(config.settings.reservation_fraction, 0.25);
    assert_eq!(config.settings.alert_threshold, 0.2);
    assert_eq!(config.settings.alert_cooldown_secs, 600);
    assert_eq!(config.settings.tokens_per_credit, 500);
    assert_eq!(config.settings.admin_email.as_deref(), Some("ops@example.com"));
    assert_eq!(config.settings.default_priority.as_ref().unwrap().len(), 3);

    assert_eq!(config.providers.len(), 2);
    assert_eq!(config.providers[0].provider_type, "groq");
    assert!(config.providers[0].enabled);
    assert!(!config.providers[1].enabled);
    assert_eq!(config.providers[1].endpoint.as_deref(), Some("http://localhost:9000/v1/messages"));
}

#[test]
fn test_provider_defaults() {
    let toml = r#"
[[providers]]
type = "deepseek"
"#;

    let config = parse_config(toml).unwrap();
    let provider = &config.providers[0];
    assert!(provider.model.is_empty());
    assert!(provider.api_key.is_empty());
    assert!(provider.enabled);
    assert!(provider.endpoint.is_none());
}

#[test]
fn test_env_var_in_endpoint_and_email() {
    env::set_var("SEOAAA_CFG_TEST_HOST", "proxy.internal");
    env::set_var("SEOAAA_CFG_TEST_EMAIL", "alerts@example.com");

    let toml = r#"
[settings]
admin_email = "${SEOAAA_CFG_TEST_EMAIL}"

[[providers]]
type = "gemini"
api_key = "key"
endpoint = "https://${SEOAAA_CFG_TEST_HOST}/gemini"
"#;

    let config = parse_config(toml).unwrap();
    assert_eq!(config.providers[0].endpoint.as_deref(), Some("https://proxy.internal/gemini"));
    assert_eq!(config.settings.admin_email.as_deref(), Some("alerts@example.com"));

    env::remove_var("SEOAAA_CFG_TEST_HOST");
    env::remove_var("SEOAAA_CFG_TEST_EMAIL");
}

#[test]
fn test_env_var_missing() {
    let toml = r#"
[[providers]]
type = "groq"
api_key = "${SEOAAA_CFG_TEST_NOT_SET}"
"#;

    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("SEOAAA_CFG_TEST_NOT_SET"));
    assert!(err.contains("not found"));
}

#[test]
fn test_all_valid_provider_types() {
    for provider in ["groq", "gemini", "deepseek", "claude", "google", "anthropic"] {
        let toml = format!("[[providers]]\ntype = \"{}\"\napi_key = \"key\"\n", provider);
        assert!(parse_config(&toml).is_ok(), "Provider '{}' should be valid", provider);
    }
}

#[test]
fn test_invalid_provider_type() {
    let toml = r#"
[[providers]]
type = "openai"
api_key = "key"
"#;

    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("Unknown provider type"));
    assert!(err.contains("groq, gemini, deepseek, claude"));
}

#[test]
fn test_duplicate_provider_rejected() {
    let toml = r#"
[[providers]]
type = "claude"

[[providers]]
type = "anthropic"
"#;

    assert!(parse_config(toml).is_err());
}

#[test]
fn test_alert_threshold_out_of_range() {
    let toml = r#"
[settings]
alert_threshold = 0.0
"#;

    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("alert_threshold"));
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_from_file() {
    let toml_content = r#"
[[providers]]
type = "groq"
api_key = "file-key"
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(toml_content.as_bytes()).unwrap();

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.providers[0].api_key, "file-key");
}

#[test]
fn test_load_nonexistent_file() {
    let err = load_config("/nonexistent/path/config.toml").unwrap_err().to_string();
    assert!(err.contains("Failed to read"));
}

#[test]
fn test_invalid_toml_syntax() {
    let toml = r#"
[[providers]
type = "groq"  # Missing closing bracket
"#;

    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("Failed to parse TOML"));
}

// ============================================================================
// Builder from configuration
// ============================================================================

#[test]
fn test_builder_from_config_file() {
    let toml_content = r#"
[settings]
default_priority = ["gemini", "deepseek"]

[[providers]]
type = "gemini"
api_key = "k1"

[[providers]]
type = "deepseek"
model = "deepseek-reasoner"
api_key = "k2"
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(toml_content.as_bytes()).unwrap();

    let orchestrator = OrchestratorBuilder::from_config_file(temp_file.path()).unwrap().build().unwrap();
    assert_eq!(orchestrator.priority().default_order(), &[ProviderType::Gemini, ProviderType::DeepSeek]);
    assert_eq!(orchestrator.registry().model_for(ProviderType::DeepSeek), "deepseek-reasoner");
    assert_eq!(orchestrator.registry().model_for(ProviderType::Gemini), ProviderType::Gemini.default_model());
}
