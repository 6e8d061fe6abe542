//! Collaborators the orchestrator depends on, specified only by interface.
//!
//! Persistence, billing and notification delivery live outside this crate.
//! `InMemoryStore` and `JsonFileStore` are provided for tests, local runs and
//! deployments without a database.

mod types;
mod memory;
mod json_file;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreResult;

pub use types::{UsageLogEntry, UsageStatus, UserBalance, BalanceStatus, AdminNotification};
pub use memory::{InMemoryStore, LogNotifier, SentEmail};
pub use json_file::JsonFileStore;

/// Key/value settings (model priority lives here)
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// `Ok(None)` when the key has never been written
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;
}

/// Append-only audit log of provider attempts
#[async_trait]
pub trait UsageLogStore: Send + Sync {
    async fn append(&self, entry: UsageLogEntry) -> StoreResult<()>;
}

/// Per-user credit balances
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn get_balance(&self, user_id: &str) -> StoreResult<UserBalance>;
    async fn increment_usage(&self, user_id: &str, amount: u64) -> StoreResult<()>;
}

/// Operator notifications
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> StoreResult<()>;
    async fn append_admin_notification(&self, record: AdminNotification) -> StoreResult<()>;
}
