use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::providers::ProviderType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    Success,
    Failed,
}

/// Audit record for one provider attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub provider: ProviderType,
    pub model: String,
    pub task_name: String,
    pub task_type: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Credits charged for this attempt
    pub cost: u64,
    pub status: UsageStatus,
    pub error_message: Option<String>,
    pub duration_ms: u64,
    pub user_id: Option<String>,
    pub brand_id: Option<String>,
    pub article_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UsageLogEntry {
    pub fn is_success(&self) -> bool {
        self.status == UsageStatus::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    #[default]
    Active,
    Trialing,
    PastDue,
    Canceled,
}

/// A user's credit ceiling and consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalance {
    pub used: u64,
    pub limit: u64,
    #[serde(default)]
    pub status: BalanceStatus,
}

impl UserBalance {
    pub fn new(used: u64, limit: u64) -> Self {
        Self { used, limit, status: BalanceStatus::Active }
    }

    /// `used + anticipated` would exceed the limit
    pub fn would_exceed(&self, anticipated: u64) -> bool {
        self.used.saturating_add(anticipated) > self.limit
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }
}

/// Admin-facing notification record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminNotification {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl AdminNotification {
    pub fn new(kind: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}
