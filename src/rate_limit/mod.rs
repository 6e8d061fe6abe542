//! Provider quota tracking
//!
//! Providers report their current quota window in response headers. The
//! `RateTracker` keeps the last reported window per provider and answers,
//! without a network call, whether a provider is worth trying right now.

pub mod metadata;
pub mod tracker;

pub use metadata::{RateLimitMetadata, ResetSignal, parse_reset_duration};
pub use tracker::{ProviderQuotaState, RateTracker, resolve_reset};
