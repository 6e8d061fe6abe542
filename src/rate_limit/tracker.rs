use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::constants;
use crate::providers::ProviderType;
use crate::rate_limit::metadata::{RateLimitMetadata, ResetSignal};

/// Last known quota window for one provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuotaState {
    pub provider: ProviderType,
    pub limit_requests: u64,
    pub limit_tokens: u64,
    pub remaining_requests: u64,
    pub remaining_tokens: u64,
    pub reset_requests_at: DateTime<Utc>,
    pub reset_tokens_at: DateTime<Utc>,
}

impl ProviderQuotaState {
    /// Build a state from response metadata received at `now`
    pub fn from_metadata(provider: ProviderType, metadata: &RateLimitMetadata, now: DateTime<Utc>) -> Self {
        Self {
            provider,
            limit_requests: metadata.limit_requests,
            limit_tokens: metadata.limit_tokens,
            remaining_requests: metadata.remaining_requests,
            remaining_tokens: metadata.remaining_tokens,
            reset_requests_at: resolve_reset(&metadata.reset_requests, now),
            reset_tokens_at: resolve_reset(&metadata.reset_tokens, now),
        }
    }

    /// Remaining/limit for tokens, `None` when the limit is zero
    pub fn token_fraction(&self) -> Option<f64> {
        fraction(self.remaining_tokens, self.limit_tokens)
    }

    /// Remaining/limit for requests, `None` when the limit is zero
    pub fn request_fraction(&self) -> Option<f64> {
        fraction(self.remaining_requests, self.limit_requests)
    }

    /// The token window has rolled over since this state was recorded
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now > self.reset_tokens_at
    }

    /// Both windows keep more than `reservation_fraction` of their capacity
    pub fn has_headroom(&self, reservation_fraction: f64) -> bool {
        let tokens_ok = self.token_fraction().map_or(true, |f| f > reservation_fraction);
        let requests_ok = self.request_fraction().map_or(true, |f| f > reservation_fraction);
        tokens_ok && requests_ok
    }
}

fn fraction(remaining: u64, limit: u64) -> Option<f64> {
    if limit == 0 {
        return None;
    }
    Some(remaining as f64 / limit as f64)
}

/// Turn a reset signal into an absolute timestamp.
///
/// Anything that cannot be trusted (unparsed, negative, NaN, absurdly large)
/// falls back to one minute from `now`.
pub fn resolve_reset(signal: &ResetSignal, now: DateTime<Utc>) -> DateTime<Utc> {
    let fallback = now + Duration::seconds(constants::FALLBACK_RESET_SECS);
    match signal {
        ResetSignal::After(secs) if secs.is_finite() && *secs >= 0.0 => {
            Duration::try_milliseconds((secs * 1000.0).round() as i64)
                .and_then(|offset| now.checked_add_signed(offset))
                .unwrap_or(fallback)
        }
        ResetSignal::At(at) => *at,
        _ => fallback,
    }
}

/// Per-provider quota tracker
///
/// Holds the last quota window each provider reported. State is process-local
/// and only a heuristic; the provider's own limiter stays authoritative.
/// Entries are overwritten on every response and dropped once their token
/// window has reset.
#[derive(Debug, Default)]
pub struct RateTracker {
    states: Mutex<HashMap<ProviderType, ProviderQuotaState>>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ProviderType, ProviderQuotaState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite a provider's state from response metadata.
    ///
    /// `None` (provider exposes no metadata, or it failed to parse) leaves the
    /// current state untouched.
    pub fn record_response_metadata(&self, provider: ProviderType, metadata: Option<&RateLimitMetadata>) {
        let Some(metadata) = metadata else {
            return;
        };
        let state = ProviderQuotaState::from_metadata(provider, metadata, Utc::now());
        debug!(
            "RateTracker: {} tokens {}/{} requests {}/{} (tokens reset at {})",
            provider,
            state.remaining_tokens,
            state.limit_tokens,
            state.remaining_requests,
            state.limit_requests,
            state.reset_tokens_at
        );
        self.lock().insert(provider, state);
    }

    /// Overwrite a provider's state directly
    pub fn record_state(&self, state: ProviderQuotaState) {
        self.lock().insert(state.provider, state);
    }

    /// Whether the provider is worth trying right now.
    ///
    /// True when nothing is known, when the token window has reset (the stale
    /// entry is cleared), or when both token and request fractions exceed
    /// `reservation_fraction`.
    pub fn is_healthy(&self, provider: ProviderType, reservation_fraction: f64) -> bool {
        let now = Utc::now();
        let mut states = self.lock();
        let Some(state) = states.get(&provider) else {
            return true;
        };
        if state.is_stale(now) {
            debug!("RateTracker: quota window for {} has reset, clearing state", provider);
            states.remove(&provider);
            return true;
        }
        state.has_headroom(reservation_fraction)
    }

    /// Current state, with stale entries purged
    pub fn state(&self, provider: ProviderType) -> Option<ProviderQuotaState> {
        let now = Utc::now();
        let mut states = self.lock();
        if states.get(&provider).is_some_and(|s| s.is_stale(now)) {
            states.remove(&provider);
            return None;
        }
        states.get(&provider).cloned()
    }

    pub fn remaining_tokens(&self, provider: ProviderType) -> Option<u64> {
        self.state(provider).map(|s| s.remaining_tokens)
    }

    pub fn remaining_token_fraction(&self, provider: ProviderType) -> Option<f64> {
        self.state(provider).and_then(|s| s.token_fraction())
    }

    pub fn clear(&self, provider: ProviderType) {
        self.lock().remove(&provider);
    }

    /// All non-stale states
    pub fn snapshot(&self) -> Vec<ProviderQuotaState> {
        let now = Utc::now();
        let mut states = self.lock();
        states.retain(|_, s| !s.is_stale(now));
        states.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(remaining_tokens: u64, limit_tokens: u64) -> RateLimitMetadata {
        RateLimitMetadata {
            limit_requests: 1000,
            limit_tokens,
            remaining_requests: 900,
            remaining_tokens,
            reset_requests: ResetSignal::After(30.0),
            reset_tokens: ResetSignal::After(30.0),
        }
    }

    #[test]
    fn test_resolve_reset_fallbacks() {
        let now = Utc::now();
        let fallback = now + Duration::seconds(60);
        assert_eq!(resolve_reset(&ResetSignal::Unparsed("bogus".into()), now), fallback);
        assert_eq!(resolve_reset(&ResetSignal::After(f64::NAN), now), fallback);
        assert_eq!(resolve_reset(&ResetSignal::After(-5.0), now), fallback);
        assert_eq!(resolve_reset(&ResetSignal::After(f64::INFINITY), now), fallback);
        assert_eq!(resolve_reset(&ResetSignal::After(1.5), now), now + Duration::milliseconds(1500));
    }

    #[test]
    fn test_unknown_provider_is_healthy() {
        let tracker = RateTracker::new();
        assert!(tracker.is_healthy(ProviderType::Groq, 0.4));
        assert!(tracker.state(ProviderType::Groq).is_none());
    }

    #[test]
    fn test_missing_metadata_keeps_state() {
        let tracker = RateTracker::new();
        tracker.record_response_metadata(ProviderType::Groq, Some(&metadata(100, 1000)));
        tracker.record_response_metadata(ProviderType::Groq, None);
        assert_eq!(tracker.remaining_tokens(ProviderType::Groq), Some(100));
    }

    #[test]
    fn test_state_is_overwritten() {
        let tracker = RateTracker::new();
        tracker.record_response_metadata(ProviderType::Groq, Some(&metadata(100, 1000)));
        tracker.record_response_metadata(ProviderType::Groq, Some(&metadata(800, 1000)));
        assert_eq!(tracker.remaining_tokens(ProviderType::Groq), Some(800));
        assert!(tracker.is_healthy(ProviderType::Groq, 0.4));
    }

    #[test]
    fn test_zero_limit_does_not_block() {
        let tracker = RateTracker::new();
        tracker.record_response_metadata(ProviderType::Groq, Some(&metadata(0, 0)));
        assert!(tracker.is_healthy(ProviderType::Groq, 0.4));
        assert_eq!(tracker.remaining_token_fraction(ProviderType::Groq), None);
    }

    #[test]
    fn test_low_request_fraction_is_unhealthy() {
        let tracker = RateTracker::new();
        let mut md = metadata(900, 1000);
        md.remaining_requests = 100;
        tracker.record_response_metadata(ProviderType::Claude, Some(&md));
        assert!(!tracker.is_healthy(ProviderType::Claude, 0.4));
    }
}
