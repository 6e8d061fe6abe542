use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use log::info;
use serde_json::Value;

use crate::errors::{StoreError, StoreResult};
use super::{
    AdminNotification, BalanceStore, NotificationChannel, SettingsStore, UsageLogEntry, UsageLogStore,
    UserBalance,
};

/// An email handed to a notification channel
#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
struct MemoryState {
    settings: HashMap<String, Value>,
    usage_logs: Vec<UsageLogEntry>,
    balances: HashMap<String, UserBalance>,
    emails: Vec<SentEmail>,
    notifications: Vec<AdminNotification>,
}

/// Process-local implementation of every collaborator trait
///
/// Balance increments happen under a single lock, so concurrent tasks for
/// the same user never lose an update here.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_balance(&self, user_id: impl Into<String>, balance: UserBalance) {
        self.lock().balances.insert(user_id.into(), balance);
    }

    pub fn balance(&self, user_id: &str) -> Option<UserBalance> {
        self.lock().balances.get(user_id).cloned()
    }

    pub fn usage_logs(&self) -> Vec<UsageLogEntry> {
        self.lock().usage_logs.clone()
    }

    pub fn emails(&self) -> Vec<SentEmail> {
        self.lock().emails.clone()
    }

    pub fn notifications(&self) -> Vec<AdminNotification> {
        self.lock().notifications.clone()
    }
}

#[async_trait]
impl SettingsStore for InMemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.lock().settings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.lock().settings.insert(key.to_string(), value);
        Ok(())
    }
}

#[async_trait]
impl UsageLogStore for InMemoryStore {
    async fn append(&self, entry: UsageLogEntry) -> StoreResult<()> {
        self.lock().usage_logs.push(entry);
        Ok(())
    }
}

#[async_trait]
impl BalanceStore for InMemoryStore {
    async fn get_balance(&self, user_id: &str) -> StoreResult<UserBalance> {
        self.lock()
            .balances
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("balance for user {}", user_id)))
    }

    async fn increment_usage(&self, user_id: &str, amount: u64) -> StoreResult<()> {
        let mut state = self.lock();
        let balance = state
            .balances
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("balance for user {}", user_id)))?;
        balance.used = balance.used.saturating_add(amount);
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for InMemoryStore {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> StoreResult<()> {
        self.lock().emails.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn append_admin_notification(&self, record: AdminNotification) -> StoreResult<()> {
        self.lock().notifications.push(record);
        Ok(())
    }
}

/// Notification channel that only writes to the log
///
/// Used when no mail transport is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl NotificationChannel for LogNotifier {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> StoreResult<()> {
        info!("Email to {} | {} | {}", to, subject, body);
        Ok(())
    }

    async fn append_admin_notification(&self, record: AdminNotification) -> StoreResult<()> {
        info!("Admin notification [{}] {}: {}", record.kind, record.title, record.message);
        Ok(())
    }
}
