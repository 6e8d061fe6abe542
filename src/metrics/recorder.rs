//! Metric recording functions

use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{ProviderType, TokenUsage};

use super::{labels, names};

/// Record a successful provider attempt
pub fn record_attempt_success(provider: ProviderType, model: &str, task: &str, duration: Duration, usage: &TokenUsage) {
    let provider = labels::provider_label(provider);

    metrics::counter!(
        names::ATTEMPTS_TOTAL,
        labels::keys::PROVIDER => provider,
        labels::keys::TASK => task.to_string(),
        "status" => "success"
    )
    .increment(1);

    metrics::histogram!(
        names::ATTEMPT_DURATION,
        labels::keys::PROVIDER => provider,
        labels::keys::TASK => task.to_string()
    )
    .record(duration.as_secs_f64());

    metrics::counter!(
        names::TOKENS_INPUT,
        labels::keys::PROVIDER => provider,
        labels::keys::MODEL => model.to_string()
    )
    .increment(usage.input_tokens);

    metrics::counter!(
        names::TOKENS_OUTPUT,
        labels::keys::PROVIDER => provider,
        labels::keys::MODEL => model.to_string()
    )
    .increment(usage.output_tokens);
}

/// Record a failed provider attempt
pub fn record_attempt_failure(provider: ProviderType, task: &str, error: &ProviderError, duration: Duration) {
    let provider = labels::provider_label(provider);

    // failures still count as attempts
    metrics::counter!(
        names::ATTEMPTS_TOTAL,
        labels::keys::PROVIDER => provider,
        labels::keys::TASK => task.to_string(),
        "status" => "failed"
    )
    .increment(1);

    metrics::histogram!(
        names::ATTEMPT_DURATION,
        labels::keys::PROVIDER => provider,
        labels::keys::TASK => task.to_string()
    )
    .record(duration.as_secs_f64());

    metrics::counter!(
        names::ERRORS_TOTAL,
        labels::keys::PROVIDER => provider,
        labels::keys::ERROR_TYPE => labels::error_type_label(error)
    )
    .increment(1);
}

/// Update provider health gauge
pub fn set_provider_health(provider: ProviderType, healthy: bool) {
    metrics::gauge!(
        names::PROVIDER_HEALTHY,
        labels::keys::PROVIDER => labels::provider_label(provider)
    )
    .set(if healthy { 1.0 } else { 0.0 });
}

/// Record credits charged to a user
pub fn record_credits_debited(credits: u64) {
    metrics::counter!(names::CREDITS_DEBITED).increment(credits);
}

/// Record a capacity alert that went out
pub fn record_alert_fired() {
    metrics::counter!(names::ALERTS_TOTAL).increment(1);
}

/// Record a call rejected by the pre-flight balance check
pub fn record_quota_rejection() {
    metrics::counter!(names::QUOTA_REJECTIONS_TOTAL).increment(1);
}
