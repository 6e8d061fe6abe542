//! Tests for provider types, adapters and error classification.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;

use seoaaa_orchestrator::rate_limit::{parse_reset_duration, ResetSignal};
use seoaaa_orchestrator::{
    create_adapter, ProviderAdapter, ProviderError, ProviderRegistry, ProviderRequest, ProviderType,
    RateLimitMetadata,
};

// ============================================================================
// ProviderType Conversion Tests
// ============================================================================

#[test]
fn test_provider_type_from_str() {
    assert_eq!("groq".parse::<ProviderType>(), Ok(ProviderType::Groq));
    assert_eq!("GEMINI".parse::<ProviderType>(), Ok(ProviderType::Gemini));
    assert_eq!("DeepSeek".parse::<ProviderType>(), Ok(ProviderType::DeepSeek));
    assert_eq!(" claude ".parse::<ProviderType>(), Ok(ProviderType::Claude));
}

#[test]
fn test_provider_type_aliases() {
    assert_eq!("google".parse::<ProviderType>(), Ok(ProviderType::Gemini));
    assert_eq!("anthropic".parse::<ProviderType>(), Ok(ProviderType::Claude));
}

#[test]
fn test_provider_type_from_str_unknown() {
    let err = "openai".parse::<ProviderType>().unwrap_err();
    assert!(err.contains("Unknown provider"));
}

#[test]
fn test_provider_type_display() {
    assert_eq!(format!("{}", ProviderType::Groq), "Groq");
    assert_eq!(format!("{}", ProviderType::Gemini), "Gemini");
    assert_eq!(format!("{}", ProviderType::DeepSeek), "DeepSeek");
    assert_eq!(format!("{}", ProviderType::Claude), "Claude");
}

#[test]
fn test_provider_type_serde_uses_ids() {
    assert_eq!(serde_json::to_string(&ProviderType::DeepSeek).unwrap(), "\"deepseek\"");
    let parsed: ProviderType = serde_json::from_str("\"claude\"").unwrap();
    assert_eq!(parsed, ProviderType::Claude);
}

#[test]
fn test_all_providers_have_ids_and_default_models() {
    for provider in ProviderType::ALL {
        assert_eq!(provider.id().parse::<ProviderType>(), Ok(provider));
        assert!(!provider.default_model().is_empty());
    }
}

// ============================================================================
// Adapters
// ============================================================================

#[test]
fn test_create_adapter_uses_default_model_when_empty() {
    let adapter = create_adapter(ProviderType::Gemini, "key".to_string(), String::new(), None, true);
    assert_eq!(adapter.provider(), ProviderType::Gemini);
    assert_eq!(adapter.model(), ProviderType::Gemini.default_model());
    assert!(adapter.is_enabled());
}

#[tokio::test]
async fn test_disabled_adapter_refuses_without_network() {
    let adapter = create_adapter(ProviderType::Groq, "key".to_string(), String::new(), None, false);
    let result = adapter.call(&ProviderRequest::new("hello", 0.5)).await;
    assert!(matches!(result, Err(ProviderError::Disabled(_))));
}

#[tokio::test]
async fn test_missing_api_key_is_auth_error() {
    let adapter = create_adapter(ProviderType::Claude, "  ".to_string(), String::new(), None, true);
    let result = adapter.call(&ProviderRequest::new("hello", 0.5)).await;
    assert!(matches!(result, Err(ProviderError::Auth(_))));
}

#[test]
fn test_registry_lookup() {
    let registry = ProviderRegistry::new()
        .with_adapter(create_adapter(ProviderType::Groq, "k".to_string(), "custom-model".to_string(), None, true));

    assert!(registry.contains(ProviderType::Groq));
    assert!(!registry.contains(ProviderType::Claude));
    assert_eq!(registry.model_for(ProviderType::Groq), "custom-model");
    assert_eq!(registry.model_for(ProviderType::Claude), ProviderType::Claude.default_model());
    assert_eq!(registry.len(), 1);
}

// ============================================================================
// Error classification
// ============================================================================

#[test]
fn test_error_classification() {
    assert!(matches!(
        ProviderError::from_api_response(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string()),
        ProviderError::RateLimit(_)
    ));
    assert!(matches!(
        ProviderError::from_api_response(StatusCode::UNAUTHORIZED, "bad key".to_string()),
        ProviderError::Auth(_)
    ));
    assert!(matches!(
        ProviderError::from_api_response(StatusCode::BAD_REQUEST, "RESOURCE_EXHAUSTED: quota".to_string()),
        ProviderError::RateLimit(_)
    ));
    assert!(matches!(
        ProviderError::from_api_response(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
        ProviderError::Api(_)
    ));
}

// ============================================================================
// Rate-limit headers
// ============================================================================

fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(*name, HeaderValue::from_static(value));
    }
    map
}

#[test]
fn test_groq_headers_parsed() {
    let map = headers(&[
        ("x-ratelimit-limit-requests", "14400"),
        ("x-ratelimit-limit-tokens", "18000"),
        ("x-ratelimit-remaining-requests", "14370"),
        ("x-ratelimit-remaining-tokens", "17997"),
        ("x-ratelimit-reset-requests", "2m59.56s"),
        ("x-ratelimit-reset-tokens", "7.66s"),
    ]);

    let metadata = RateLimitMetadata::from_groq_headers(&map).unwrap();
    assert_eq!(metadata.limit_tokens, 18000);
    assert_eq!(metadata.remaining_tokens, 17997);
    match metadata.reset_requests {
        ResetSignal::After(secs) => assert!((secs - 179.56).abs() < 1e-6),
        other => panic!("unexpected reset signal {:?}", other),
    }
}

#[test]
fn test_groq_headers_missing_counter() {
    let map = headers(&[
        ("x-ratelimit-limit-requests", "14400"),
        ("x-ratelimit-remaining-requests", "14370"),
        ("x-ratelimit-remaining-tokens", "17997"),
    ]);
    assert!(RateLimitMetadata::from_groq_headers(&map).is_none());
}

#[test]
fn test_anthropic_headers_parsed() {
    let map = headers(&[
        ("anthropic-ratelimit-requests-limit", "50"),
        ("anthropic-ratelimit-tokens-limit", "40000"),
        ("anthropic-ratelimit-requests-remaining", "49"),
        ("anthropic-ratelimit-tokens-remaining", "39000"),
        ("anthropic-ratelimit-requests-reset", "2030-01-01T00:00:00Z"),
        ("anthropic-ratelimit-tokens-reset", "not a date"),
    ]);

    let metadata = RateLimitMetadata::from_anthropic_headers(&map).unwrap();
    assert_eq!(metadata.remaining_requests, 49);
    assert!(matches!(metadata.reset_requests, ResetSignal::At(_)));
    assert!(matches!(metadata.reset_tokens, ResetSignal::Unparsed(_)));
}

#[test]
fn test_parse_reset_duration() {
    assert_eq!(parse_reset_duration("6s"), Some(6.0));
    assert_eq!(parse_reset_duration("1m30s"), Some(90.0));
    assert_eq!(parse_reset_duration("250ms"), Some(0.25));
    assert_eq!(parse_reset_duration("1h"), Some(3600.0));
    assert_eq!(parse_reset_duration("12"), Some(12.0));
    assert_eq!(parse_reset_duration("soon"), None);
    assert_eq!(parse_reset_duration(""), None);
}
