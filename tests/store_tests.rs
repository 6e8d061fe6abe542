//! Tests for the JSON-file store.

use chrono::Utc;
use serde_json::json;
use tempfile::TempDir;

use seoaaa_orchestrator::stores::{
    AdminNotification, BalanceStore, NotificationChannel, SettingsStore, UsageLogEntry, UsageLogStore, UsageStatus,
    UserBalance,
};
use seoaaa_orchestrator::{JsonFileStore, ProviderType, StoreError};

fn entry(status: UsageStatus) -> UsageLogEntry {
    UsageLogEntry {
        provider: ProviderType::Groq,
        model: "llama-3.3-70b-versatile".to_string(),
        task_name: "generate_article".to_string(),
        task_type: "generation".to_string(),
        input_tokens: 100,
        output_tokens: 50,
        cost: 1,
        status,
        error_message: None,
        duration_ms: 1200,
        user_id: Some("user-1".to_string()),
        brand_id: None,
        article_id: Some("article-1".to_string()),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("data.json"));

    assert_eq!(store.get("ai_model_priority").await.unwrap(), None);
    assert!(store.usage_logs().await.unwrap().is_empty());
    assert!(matches!(store.get_balance("user-1").await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_settings_persist_across_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");

    JsonFileStore::new(&path).set("ai_model_priority", json!(["claude", "groq"])).await.unwrap();

    let reopened = JsonFileStore::new(&path);
    assert_eq!(reopened.get("ai_model_priority").await.unwrap(), Some(json!(["claude", "groq"])));
}

#[tokio::test]
async fn test_usage_log_appends_in_order() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("data.json"));

    store.append(entry(UsageStatus::Failed)).await.unwrap();
    store.append(entry(UsageStatus::Success)).await.unwrap();

    let logs = store.usage_logs().await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].status, UsageStatus::Failed);
    assert_eq!(logs[1].status, UsageStatus::Success);
}

#[tokio::test]
async fn test_balance_increment() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("data.json"));

    store.set_balance("user-1", UserBalance::new(10, 100)).await.unwrap();
    store.increment_usage("user-1", 5).await.unwrap();

    let balance = store.get_balance("user-1").await.unwrap();
    assert_eq!(balance.used, 15);
    assert_eq!(balance.limit, 100);
    assert!(store.increment_usage("nobody", 1).await.is_err());
}

#[tokio::test]
async fn test_admin_notifications_recorded() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("data.json"));

    store.send_email("ops@example.com", "subject", "body").await.unwrap();
    store
        .append_admin_notification(AdminNotification::new("provider_capacity_low", "Low", "All low"))
        .await
        .unwrap();

    let notifications = store.admin_notifications().await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Low");
}

#[tokio::test]
async fn test_corrupt_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(matches!(store.get("anything").await, Err(StoreError::Serialization(_))));
}
