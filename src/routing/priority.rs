use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;

use crate::constants;
use crate::errors::{OrchestratorError, OrchestratorResult};
use crate::providers::ProviderType;
use crate::stores::SettingsStore;

/// Admin-editable provider order, persisted in the settings store
pub struct ModelPriority {
    store: Arc<dyn SettingsStore>,
    default_order: Vec<ProviderType>,
}

impl ModelPriority {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self::with_default(store, constants::DEFAULT_PRIORITY.to_vec())
    }

    /// Use `default_order` whenever nothing usable is persisted
    pub fn with_default(store: Arc<dyn SettingsStore>, default_order: Vec<ProviderType>) -> Self {
        let default_order = if default_order.is_empty() {
            constants::DEFAULT_PRIORITY.to_vec()
        } else {
            default_order
        };
        Self { store, default_order }
    }

    pub fn default_order(&self) -> &[ProviderType] {
        &self.default_order
    }

    /// The persisted order.
    ///
    /// Never fails: a store error, a missing key or an unusable value all
    /// yield the default order.
    pub async fn get_priority(&self) -> Vec<ProviderType> {
        match self.store.get(constants::PRIORITY_SETTINGS_KEY).await {
            Ok(Some(value)) => match parse_priority(&value) {
                Some(order) => order,
                None => {
                    warn!("Stored model priority {} is unusable, using default order", value);
                    self.default_order.clone()
                }
            },
            Ok(None) => {
                debug!("No model priority stored, using default order");
                self.default_order.clone()
            }
            Err(e) => {
                warn!("Failed to read model priority ({}), using default order", e);
                self.default_order.clone()
            }
        }
    }

    /// Replace the whole order
    pub async fn set_priority(&self, order: Vec<ProviderType>) -> OrchestratorResult<()> {
        validate_order(&order)?;
        let value = serde_json::to_value(&order)
            .map_err(|e| OrchestratorError::Config(format!("Failed to serialize priority: {}", e)))?;
        self.store
            .set(constants::PRIORITY_SETTINGS_KEY, value)
            .await
            .map_err(|e| OrchestratorError::Config(format!("Failed to save model priority: {}", e)))?;
        debug!("Model priority set to {:?}", order);
        Ok(())
    }

    /// Move one provider to `position` (clamped to the end), inserting it if absent
    pub async fn move_provider(&self, provider: ProviderType, position: usize) -> OrchestratorResult<Vec<ProviderType>> {
        let mut order = self.get_priority().await;
        order.retain(|p| *p != provider);
        let position = position.min(order.len());
        order.insert(position, provider);
        self.set_priority(order.clone()).await?;
        Ok(order)
    }
}

/// Parse a stored JSON array of provider ids, skipping unknown and duplicate entries
fn parse_priority(value: &Value) -> Option<Vec<ProviderType>> {
    let items = value.as_array()?;
    let mut order = Vec::new();
    for item in items {
        match item.as_str().map(str::parse::<ProviderType>) {
            Some(Ok(provider)) if !order.contains(&provider) => order.push(provider),
            Some(Ok(_)) => {}
            _ => warn!("Ignoring unknown provider {} in stored priority", item),
        }
    }
    if order.is_empty() { None } else { Some(order) }
}

pub(crate) fn validate_order(order: &[ProviderType]) -> OrchestratorResult<()> {
    if order.is_empty() {
        return Err(OrchestratorError::Config("Model priority cannot be empty".to_string()));
    }
    for (i, provider) in order.iter().enumerate() {
        if order[..i].contains(provider) {
            return Err(OrchestratorError::Config(format!(
                "Provider '{}' appears more than once in model priority",
                provider.id()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_priority_skips_unknown_and_duplicates() {
        let value = json!(["gemini", "openai", "groq", "gemini"]);
        assert_eq!(parse_priority(&value), Some(vec![ProviderType::Gemini, ProviderType::Groq]));
    }

    #[test]
    fn test_parse_priority_rejects_non_arrays() {
        assert_eq!(parse_priority(&json!("groq")), None);
        assert_eq!(parse_priority(&json!([])), None);
        assert_eq!(parse_priority(&json!([1, 2])), None);
    }

    #[test]
    fn test_validate_order() {
        assert!(validate_order(&[]).is_err());
        assert!(validate_order(&[ProviderType::Groq, ProviderType::Groq]).is_err());
        assert!(validate_order(&[ProviderType::Claude, ProviderType::Groq]).is_ok());
    }
}
