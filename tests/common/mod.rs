//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use seoaaa_orchestrator::rate_limit::{ProviderQuotaState, RateLimitMetadata, ResetSignal};
use seoaaa_orchestrator::stores::{
    AdminNotification, BalanceStore, InMemoryStore, NotificationChannel, SettingsStore, UsageLogEntry, UsageLogStore,
    UserBalance,
};
use seoaaa_orchestrator::{
    ProviderAdapter, ProviderError, ProviderRequest, ProviderResponse, ProviderResult, ProviderType, StoreError,
    StoreResult, TokenUsage,
};

/// What a fake adapter does on every call
#[derive(Clone)]
pub enum Behavior {
    Succeed { content: String, usage: TokenUsage, rate_limits: Option<RateLimitMetadata> },
    Fail(String),
}

impl Behavior {
    pub fn ok(content: &str, input_tokens: u64, output_tokens: u64) -> Self {
        Behavior::Succeed {
            content: content.to_string(),
            usage: TokenUsage::new(input_tokens, output_tokens),
            rate_limits: None,
        }
    }

    pub fn fail(reason: &str) -> Self {
        Behavior::Fail(reason.to_string())
    }
}

/// Adapter that never touches the network and counts its calls
pub struct FakeAdapter {
    provider: ProviderType,
    model: String,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl FakeAdapter {
    pub fn new(provider: ProviderType, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            provider,
            model: format!("{}-test-model", provider.id()),
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for FakeAdapter {
    async fn call(&self, _request: &ProviderRequest) -> ProviderResult<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed { content, usage, rate_limits } => {
                Ok(ProviderResponse::new(content.clone(), self.model.clone(), *usage).with_rate_limits(rate_limits.clone()))
            }
            Behavior::Fail(reason) => Err(ProviderError::Api(reason.clone())),
        }
    }

    fn provider(&self) -> ProviderType {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Quota state with the given token window, resetting in ten minutes
pub fn quota_state(provider: ProviderType, remaining_tokens: u64, limit_tokens: u64) -> ProviderQuotaState {
    let reset = chrono::Utc::now() + chrono::Duration::minutes(10);
    ProviderQuotaState {
        provider,
        limit_requests: 1000,
        limit_tokens,
        remaining_requests: 1000,
        remaining_tokens,
        reset_requests_at: reset,
        reset_tokens_at: reset,
    }
}

/// Response metadata with the given token window, resetting in ten minutes
pub fn quota_metadata(remaining_tokens: u64, limit_tokens: u64) -> RateLimitMetadata {
    RateLimitMetadata {
        limit_requests: 1000,
        limit_tokens,
        remaining_requests: 1000,
        remaining_tokens,
        reset_requests: ResetSignal::After(600.0),
        reset_tokens: ResetSignal::After(600.0),
    }
}

/// `InMemoryStore` wrapper whose individual operations can be made to fail
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    pub fail_settings: bool,
    pub fail_usage_log: bool,
    pub fail_balance_read: bool,
    pub fail_increment: bool,
    pub fail_email: bool,
    pub fail_notification: bool,
}

fn unavailable(what: &str) -> StoreError {
    StoreError::Unavailable(format!("{} is down", what))
}

#[async_trait]
impl SettingsStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        if self.fail_settings {
            return Err(unavailable("settings"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        if self.fail_settings {
            return Err(unavailable("settings"));
        }
        self.inner.set(key, value).await
    }
}

#[async_trait]
impl UsageLogStore for FlakyStore {
    async fn append(&self, entry: UsageLogEntry) -> StoreResult<()> {
        if self.fail_usage_log {
            return Err(unavailable("usage log"));
        }
        self.inner.append(entry).await
    }
}

#[async_trait]
impl BalanceStore for FlakyStore {
    async fn get_balance(&self, user_id: &str) -> StoreResult<UserBalance> {
        if self.fail_balance_read {
            return Err(unavailable("balances"));
        }
        self.inner.get_balance(user_id).await
    }

    async fn increment_usage(&self, user_id: &str, amount: u64) -> StoreResult<()> {
        if self.fail_increment {
            return Err(unavailable("balances"));
        }
        self.inner.increment_usage(user_id, amount).await
    }
}

#[async_trait]
impl NotificationChannel for FlakyStore {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> StoreResult<()> {
        if self.fail_email {
            return Err(unavailable("mailer"));
        }
        self.inner.send_email(to, subject, body).await
    }

    async fn append_admin_notification(&self, record: AdminNotification) -> StoreResult<()> {
        if self.fail_notification {
            return Err(unavailable("notifications"));
        }
        self.inner.append_admin_notification(record).await
    }
}
