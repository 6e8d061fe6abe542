use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use crate::errors::{StoreError, StoreResult};
use super::{
    AdminNotification, BalanceStore, NotificationChannel, SettingsStore, UsageLogEntry, UsageLogStore,
    UserBalance,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonDocument {
    #[serde(default)]
    settings: HashMap<String, Value>,
    #[serde(default)]
    usage_logs: Vec<UsageLogEntry>,
    #[serde(default)]
    balances: HashMap<String, UserBalance>,
    #[serde(default)]
    admin_notifications: Vec<AdminNotification>,
}

/// Single-document JSON persistence
///
/// Every operation reads the whole file and writes it back. A file that does
/// not exist yet reads as an empty document. Writes are serialized within
/// this process only; two processes sharing a file can lose updates,
/// including balance increments.
///
/// Email delivery is not persisted: `send_email` only logs.
pub struct JsonFileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), guard: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<JsonDocument> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(JsonDocument::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(JsonDocument::default()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn save(&self, document: &JsonDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Load, apply `update`, save, all under the in-process guard
    async fn modify<T>(&self, update: impl FnOnce(&mut JsonDocument) -> StoreResult<T>) -> StoreResult<T> {
        let _guard = self.guard.lock().await;
        let mut document = self.load().await?;
        let result = update(&mut document)?;
        self.save(&document).await?;
        Ok(result)
    }

    pub async fn set_balance(&self, user_id: &str, balance: UserBalance) -> StoreResult<()> {
        self.modify(|doc| {
            doc.balances.insert(user_id.to_string(), balance);
            Ok(())
        })
        .await
    }

    pub async fn usage_logs(&self) -> StoreResult<Vec<UsageLogEntry>> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.usage_logs)
    }

    pub async fn admin_notifications(&self) -> StoreResult<Vec<AdminNotification>> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.admin_notifications)
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.settings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.modify(|doc| {
            doc.settings.insert(key.to_string(), value);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl UsageLogStore for JsonFileStore {
    async fn append(&self, entry: UsageLogEntry) -> StoreResult<()> {
        self.modify(|doc| {
            doc.usage_logs.push(entry);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl BalanceStore for JsonFileStore {
    async fn get_balance(&self, user_id: &str) -> StoreResult<UserBalance> {
        let _guard = self.guard.lock().await;
        self.load()
            .await?
            .balances
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("balance for user {}", user_id)))
    }

    async fn increment_usage(&self, user_id: &str, amount: u64) -> StoreResult<()> {
        self.modify(|doc| {
            let balance = doc
                .balances
                .get_mut(user_id)
                .ok_or_else(|| StoreError::NotFound(format!("balance for user {}", user_id)))?;
            balance.used = balance.used.saturating_add(amount);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl NotificationChannel for JsonFileStore {
    async fn send_email(&self, to: &str, subject: &str, _body: &str) -> StoreResult<()> {
        log::info!("JsonFileStore has no mail transport; email to {} ({}) not sent", to, subject);
        Ok(())
    }

    async fn append_admin_notification(&self, record: AdminNotification) -> StoreResult<()> {
        self.modify(|doc| {
            doc.admin_notifications.push(record);
            Ok(())
        })
        .await
    }
}
