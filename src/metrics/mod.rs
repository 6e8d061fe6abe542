//! Metrics module
//!
//! Optional metrics emission for monitoring provider attempts, billing and
//! alerting. Enable with the `metrics` feature flag and install whichever
//! `metrics` exporter the host application uses.
//!
//! # Example
//!
//! ```ignore
//! use seoaaa_orchestrator::metrics::describe_metrics;
//! use metrics_exporter_prometheus::PrometheusBuilder;
//!
//! PrometheusBuilder::new()
//!     .with_http_listener(([127, 0, 0, 1], 9090))
//!     .install()
//!     .expect("prometheus setup");
//!
//! describe_metrics();
//! ```

pub mod labels;
mod recorder;

pub use recorder::*;

/// Metric name constants
pub mod names {
    /// Provider attempts, labelled by status
    pub const ATTEMPTS_TOTAL: &str = "ai_attempts_total";
    /// Attempt duration in seconds
    pub const ATTEMPT_DURATION: &str = "ai_attempt_duration_seconds";
    /// Total input tokens consumed
    pub const TOKENS_INPUT: &str = "ai_tokens_input_total";
    /// Total output tokens generated
    pub const TOKENS_OUTPUT: &str = "ai_tokens_output_total";
    /// Failed attempts by error type
    pub const ERRORS_TOTAL: &str = "ai_errors_total";
    /// Provider health status (1=healthy, 0=unhealthy)
    pub const PROVIDER_HEALTHY: &str = "ai_provider_healthy";
    /// Credits debited from user balances
    pub const CREDITS_DEBITED: &str = "ai_credits_debited_total";
    /// Capacity alerts sent
    pub const ALERTS_TOTAL: &str = "ai_capacity_alerts_total";
    /// Calls rejected by the balance pre-flight
    pub const QUOTA_REJECTIONS_TOTAL: &str = "ai_quota_rejections_total";
}

/// Describe all metrics with their units and descriptions.
/// Call this after setting up your metrics exporter for better discovery.
pub fn describe_metrics() {
    use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

    describe_counter!(names::ATTEMPTS_TOTAL, Unit::Count, "Total number of provider attempts");
    describe_histogram!(names::ATTEMPT_DURATION, Unit::Seconds, "Provider attempt duration in seconds");
    describe_counter!(names::TOKENS_INPUT, Unit::Count, "Total input tokens consumed");
    describe_counter!(names::TOKENS_OUTPUT, Unit::Count, "Total output tokens generated");
    describe_counter!(names::ERRORS_TOTAL, Unit::Count, "Total number of failed attempts by error type");
    describe_gauge!(names::PROVIDER_HEALTHY, Unit::Count, "Provider health status (1=healthy, 0=unhealthy)");
    describe_counter!(names::CREDITS_DEBITED, Unit::Count, "Total credits debited from user balances");
    describe_counter!(names::ALERTS_TOTAL, Unit::Count, "Total number of capacity alerts sent");
    describe_counter!(names::QUOTA_REJECTIONS_TOTAL, Unit::Count, "Total number of calls rejected for insufficient balance");
}
