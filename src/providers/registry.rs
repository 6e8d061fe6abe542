use std::collections::HashMap;
use std::sync::Arc;

use crate::providers::claude::ClaudeAdapter;
use crate::providers::deepseek::DeepSeekAdapter;
use crate::providers::gemini::GeminiAdapter;
use crate::providers::groq::GroqAdapter;
use crate::providers::instances::ProviderAdapter;
use crate::providers::types::ProviderType;

pub type SharedAdapter = Arc<dyn ProviderAdapter + Send + Sync>;

/// Factory for the built-in HTTP adapters
///
/// # Parameters
/// * `provider` - Which backend to create
/// * `api_key` - API key for authentication
/// * `model` - Model identifier (empty string selects the provider default)
/// * `endpoint` - Optional endpoint override
/// * `enabled` - Whether the adapter should be enabled
pub fn create_adapter(provider: ProviderType, api_key: String, model: String, endpoint: Option<String>, enabled: bool) -> SharedAdapter {
    match provider {
        ProviderType::Groq => Arc::new(GroqAdapter::new(api_key, model, endpoint, enabled)),
        ProviderType::Gemini => Arc::new(GeminiAdapter::new(api_key, model, endpoint, enabled)),
        ProviderType::DeepSeek => Arc::new(DeepSeekAdapter::new(api_key, model, endpoint, enabled)),
        ProviderType::Claude => Arc::new(ClaudeAdapter::new(api_key, model, endpoint, enabled)),
    }
}

/// Dispatch table from provider id to adapter
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderType, SharedAdapter>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own provider id, replacing any previous one
    pub fn register(&mut self, adapter: SharedAdapter) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    pub fn with_adapter(mut self, adapter: SharedAdapter) -> Self {
        self.register(adapter);
        self
    }

    pub fn get(&self, provider: ProviderType) -> Option<SharedAdapter> {
        self.adapters.get(&provider).cloned()
    }

    pub fn contains(&self, provider: ProviderType) -> bool {
        self.adapters.contains_key(&provider)
    }

    /// Configured model for a provider, falling back to its default
    pub fn model_for(&self, provider: ProviderType) -> String {
        self.adapters
            .get(&provider)
            .map(|adapter| adapter.model().to_string())
            .unwrap_or_else(|| provider.default_model().to_string())
    }

    pub fn providers(&self) -> Vec<ProviderType> {
        ProviderType::ALL.into_iter().filter(|p| self.adapters.contains_key(p)).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
