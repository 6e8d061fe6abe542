use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::alerting::AdminAlerter;
use crate::config::{self, Config};
use crate::constants;
use crate::errors::{OrchestratorError, OrchestratorResult};
use crate::orchestrator::executor::Orchestrator;
use crate::providers::{create_adapter, ProviderRegistry, ProviderType, SharedAdapter};
use crate::rate_limit::RateTracker;
use crate::routing::priority::validate_order;
use crate::routing::{ModelPriority, Selector};
use crate::stores::{BalanceStore, InMemoryStore, LogNotifier, NotificationChannel, SettingsStore, UsageLogStore};

/// Internal helper struct for Builder
#[derive(Clone)]
struct AdapterConfig {
    provider: ProviderType,
    api_key: String,
    model: String,
    enabled: bool,
    endpoint: Option<String>,
}

/// Orchestrator Builder
///
/// Every collaborator defaults to a shared `InMemoryStore` (alerts go to the
/// log) so an orchestrator can be built with nothing but adapters.
pub struct OrchestratorBuilder {
    adapters_to_build: Vec<AdapterConfig>,
    registry: ProviderRegistry,
    tracker: Option<Arc<RateTracker>>,
    settings: Option<Arc<dyn SettingsStore>>,
    usage_log: Option<Arc<dyn UsageLogStore>>,
    balances: Option<Arc<dyn BalanceStore>>,
    notifier: Option<Arc<dyn NotificationChannel>>,
    reservation_fraction: f64,
    alert_threshold: f64,
    alert_cooldown: Duration,
    tokens_per_credit: u64,
    admin_email: Option<String>,
    default_priority: Vec<ProviderType>,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        OrchestratorBuilder {
            adapters_to_build: Vec::new(),
            registry: ProviderRegistry::new(),
            tracker: None,
            settings: None,
            usage_log: None,
            balances: None,
            notifier: None,
            reservation_fraction: constants::DEFAULT_RESERVATION_FRACTION,
            alert_threshold: constants::DEFAULT_ALERT_THRESHOLD,
            alert_cooldown: Duration::from_secs(constants::DEFAULT_ALERT_COOLDOWN_SECS),
            tokens_per_credit: constants::DEFAULT_TOKENS_PER_CREDIT,
            admin_email: None,
            default_priority: constants::DEFAULT_PRIORITY.to_vec(),
        }
    }

    /// Builder populated from a parsed configuration
    pub fn from_config(config: &Config) -> OrchestratorResult<Self> {
        let settings = &config.settings;
        let mut builder = Self::new()
            .reservation_fraction(settings.reservation_fraction)
            .alert_threshold(settings.alert_threshold)
            .alert_cooldown(Duration::from_secs(settings.alert_cooldown_secs))
            .tokens_per_credit(settings.tokens_per_credit);

        if let Some(email) = &settings.admin_email {
            builder = builder.admin_email(email.clone());
        }
        if let Some(order) = &settings.default_priority {
            builder = builder.default_priority(parse_providers(order)?);
        }

        for provider_config in &config.providers {
            let provider: ProviderType = provider_config.provider_type.parse().map_err(OrchestratorError::Config)?;
            builder = builder
                .add_provider(provider, provider_config.model.clone(), provider_config.api_key.clone())
                .enabled(provider_config.enabled);
            if let Some(endpoint) = &provider_config.endpoint {
                builder = builder.endpoint(endpoint.clone());
            }
        }

        Ok(builder)
    }

    /// Builder populated from a TOML string
    pub fn from_config_str(content: &str) -> OrchestratorResult<Self> {
        Self::from_config(&config::parse_config(content)?)
    }

    /// Builder populated from a TOML file
    pub fn from_config_file(path: impl AsRef<Path>) -> OrchestratorResult<Self> {
        Self::from_config(&config::load_config(path)?)
    }

    /// Begins configuring a built-in HTTP adapter.
    /// Subsequent `.enabled()` / `.endpoint()` calls apply to this provider.
    pub fn add_provider(mut self, provider: ProviderType, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.adapters_to_build.push(AdapterConfig {
            provider,
            api_key: api_key.into(),
            model: model.into(),
            enabled: true,
            endpoint: None,
        });
        self
    }

    /// Sets the enabled status for the *last added* provider.
    pub fn enabled(mut self, enabled: bool) -> Self {
        match self.adapters_to_build.last_mut() {
            Some(last) => last.enabled = enabled,
            None => warn!("'.enabled()' called before '.add_provider()', ignoring"),
        }
        self
    }

    /// Sets a custom endpoint for the *last added* provider.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        match self.adapters_to_build.last_mut() {
            Some(last) => last.endpoint = Some(endpoint.into()),
            None => warn!("'.endpoint()' called before '.add_provider()', ignoring"),
        }
        self
    }

    /// Register a ready-made adapter (custom backends, test doubles)
    pub fn adapter(mut self, adapter: SharedAdapter) -> Self {
        self.registry.register(adapter);
        self
    }

    /// Share a tracker between orchestrators or inspect it from outside
    pub fn tracker(mut self, tracker: Arc<RateTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(store);
        self
    }

    pub fn usage_log_store(mut self, store: Arc<dyn UsageLogStore>) -> Self {
        self.usage_log = Some(store);
        self
    }

    pub fn balance_store(mut self, store: Arc<dyn BalanceStore>) -> Self {
        self.balances = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationChannel>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Use one object for settings, usage log, balances and notifications
    pub fn stores<S>(self, store: Arc<S>) -> Self
    where
        S: SettingsStore + UsageLogStore + BalanceStore + NotificationChannel + 'static,
    {
        self.settings_store(store.clone())
            .usage_log_store(store.clone())
            .balance_store(store.clone())
            .notifier(store)
    }

    pub fn reservation_fraction(mut self, fraction: f64) -> Self {
        self.reservation_fraction = fraction;
        self
    }

    pub fn alert_threshold(mut self, fraction: f64) -> Self {
        self.alert_threshold = fraction;
        self
    }

    pub fn alert_cooldown(mut self, cooldown: Duration) -> Self {
        self.alert_cooldown = cooldown;
        self
    }

    pub fn tokens_per_credit(mut self, tokens: u64) -> Self {
        self.tokens_per_credit = tokens;
        self
    }

    pub fn admin_email(mut self, email: impl Into<String>) -> Self {
        self.admin_email = Some(email.into());
        self
    }

    /// Order used when no priority is persisted
    pub fn default_priority(mut self, order: Vec<ProviderType>) -> Self {
        self.default_priority = order;
        self
    }

    /// Consumes the builder and constructs the `Orchestrator`.
    pub fn build(self) -> OrchestratorResult<Orchestrator> {
        validate_fraction("reservation_fraction", self.reservation_fraction)?;
        validate_fraction("alert_threshold", self.alert_threshold)?;
        if self.tokens_per_credit == 0 {
            return Err(OrchestratorError::Config("tokens_per_credit must be greater than zero".to_string()));
        }
        if !self.default_priority.is_empty() {
            validate_order(&self.default_priority)?;
        }

        let mut registry = self.registry;
        for config in self.adapters_to_build {
            if registry.contains(config.provider) {
                warn!("Adapter for {} configured twice, keeping the last one", config.provider);
            }
            registry.register(create_adapter(config.provider, config.api_key, config.model.clone(), config.endpoint, config.enabled));
            debug!("Built and registered adapter: {} ({})", config.provider, config.model);
        }
        if registry.is_empty() {
            warn!("Orchestrator built with no provider adapters; only execute() with a caller-supplied call is usable.");
        }

        let fallback = Arc::new(InMemoryStore::new());
        let settings: Arc<dyn SettingsStore> = match self.settings {
            Some(store) => store,
            None => fallback.clone(),
        };
        let usage_log: Arc<dyn UsageLogStore> = match self.usage_log {
            Some(store) => store,
            None => fallback.clone(),
        };
        let balances: Arc<dyn BalanceStore> = match self.balances {
            Some(store) => store,
            None => fallback,
        };
        let notifier: Arc<dyn NotificationChannel> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(LogNotifier),
        };

        let cooldown = chrono::Duration::from_std(self.alert_cooldown)
            .map_err(|e| OrchestratorError::Config(format!("Invalid alert cooldown: {}", e)))?;

        let tracker = self.tracker.unwrap_or_default();
        let priority = Arc::new(ModelPriority::with_default(settings, self.default_priority));
        let selector = Selector::new(priority, tracker.clone(), self.reservation_fraction);
        let alerter = AdminAlerter::new(tracker.clone(), notifier, self.admin_email, self.alert_threshold, cooldown);

        Ok(Orchestrator {
            registry,
            tracker,
            selector,
            usage_log,
            balances,
            alerter,
            tokens_per_credit: self.tokens_per_credit,
        })
    }
}

fn validate_fraction(name: &str, value: f64) -> OrchestratorResult<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(OrchestratorError::Config(format!("{} must be between 0 and 1 (exclusive), got {}", name, value)));
    }
    Ok(())
}

fn parse_providers(ids: &[String]) -> OrchestratorResult<Vec<ProviderType>> {
    ids.iter()
        .map(|id| id.parse::<ProviderType>().map_err(OrchestratorError::Config))
        .collect()
}
