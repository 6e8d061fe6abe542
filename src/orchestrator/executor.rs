use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};

use crate::alerting::AdminAlerter;
use crate::errors::{OrchestratorError, OrchestratorResult, ProviderError, ProviderResult};
use crate::orchestrator::billing::{best_effort, credit_cost};
use crate::orchestrator::builder::OrchestratorBuilder;
use crate::orchestrator::tasks::{TaskContext, TaskDefinition, TaskKind, TaskOutput};
use crate::providers::{ProviderRegistry, ProviderResponse, ProviderType, TokenUsage};
use crate::rate_limit::RateTracker;
use crate::routing::{ModelPriority, Selector};
use crate::stores::{BalanceStore, UsageLogEntry, UsageLogStore, UsageStatus};

/// Successful result of `Orchestrator::execute`
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub response: ProviderResponse,
    /// Provider that produced the response
    pub provider: ProviderType,
    /// Credits charged to the user
    pub cost: u64,
    /// Providers contacted, including the successful one
    pub attempts: usize,
    /// Errors from providers tried before the successful one
    pub failures: Vec<(ProviderType, String)>,
}

/// Failover executor
///
/// The single entry point for AI tasks. Checks the caller's balance, walks
/// the provider priority one provider at a time until one succeeds, writes
/// a usage log entry for every attempt and debits the user once.
pub struct Orchestrator {
    pub(crate) registry: ProviderRegistry,
    pub(crate) tracker: Arc<RateTracker>,
    pub(crate) selector: Selector,
    pub(crate) usage_log: Arc<dyn UsageLogStore>,
    pub(crate) balances: Arc<dyn BalanceStore>,
    pub(crate) alerter: AdminAlerter,
    pub(crate) tokens_per_credit: u64,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &Arc<RateTracker> {
        &self.tracker
    }

    pub fn priority(&self) -> &ModelPriority {
        self.selector.priority()
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn alerter(&self) -> &AdminAlerter {
        &self.alerter
    }

    pub fn tokens_per_credit(&self) -> u64 {
        self.tokens_per_credit
    }

    /// Run one task with failover.
    ///
    /// `call` is invoked with each selected provider in turn and must perform
    /// the actual adapter call. Only `QuotaExhausted` (nothing was attempted)
    /// and `AllProvidersFailed` (everything was attempted) are returned as
    /// errors; logging, billing and alerting failures are swallowed.
    pub async fn execute<F, Fut>(&self, task_name: &str, ctx: &TaskContext, mut call: F) -> OrchestratorResult<ExecutionOutcome>
    where
        F: FnMut(ProviderType) -> Fut,
        Fut: Future<Output = ProviderResult<ProviderResponse>>,
    {
        self.preflight(ctx).await?;

        let mut attempted: HashSet<ProviderType> = HashSet::new();
        let mut failures: Vec<(ProviderType, String)> = Vec::new();

        while let Some(provider) = self.selector.select_next(&attempted).await {
            attempted.insert(provider);
            debug!("Task '{}': attempt {} using {}", task_name, attempted.len(), provider);

            let start = Instant::now();
            let result = call(provider).await;
            let duration = start.elapsed();

            match result {
                Ok(response) => {
                    let cost = self.on_success(task_name, ctx, provider, &response, duration).await;
                    info!(
                        "Task '{}' succeeded with {} ({}) after {} attempt(s) in {:?}, {} credit(s)",
                        task_name,
                        provider,
                        response.model,
                        attempted.len(),
                        duration,
                        cost
                    );
                    return Ok(ExecutionOutcome {
                        response,
                        provider,
                        cost,
                        attempts: attempted.len(),
                        failures,
                    });
                }
                Err(e) => {
                    warn!("Task '{}': {} failed after {:?}: {}", task_name, provider, duration, e);
                    self.on_failure(task_name, ctx, provider, &e, duration).await;
                    failures.push((provider, e.to_string()));
                }
            }
        }

        let error = OrchestratorError::AllProvidersFailed { failures };
        warn!("Task '{}': {}", task_name, error);
        Err(error)
    }

    /// Run a task definition through the registered adapters.
    ///
    /// Generation tasks turn `AllProvidersFailed` into a degraded placeholder;
    /// analysis tasks propagate it. `QuotaExhausted` always propagates.
    pub async fn run_task(&self, task: &TaskDefinition, prompt: impl Into<String>, ctx: &TaskContext) -> OrchestratorResult<TaskOutput> {
        let request = task.request(prompt);
        let registry = &self.registry;

        let result = self
            .execute(&task.name, ctx, |provider| {
                let adapter = registry.get(provider);
                let request = request.clone();
                async move {
                    match adapter {
                        Some(adapter) => adapter.call(&request).await,
                        None => Err(ProviderError::Disabled(format!("no adapter registered for {}", provider))),
                    }
                }
            })
            .await;

        match result {
            Ok(outcome) => Ok(TaskOutput::from_outcome(outcome)),
            Err(e) if e.is_all_providers_failed() && task.kind == TaskKind::Generation => {
                warn!("Task '{}' degraded to placeholder content: {}", task.name, e);
                Ok(TaskOutput::placeholder(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn preflight(&self, ctx: &TaskContext) -> OrchestratorResult<()> {
        let Some(user_id) = ctx.user_id.as_deref() else {
            return Ok(());
        };
        if ctx.anticipated_cost == 0 {
            return Ok(());
        }

        match self.balances.get_balance(user_id).await {
            Ok(balance) if balance.would_exceed(ctx.anticipated_cost) => {
                warn!(
                    "Quota exhausted for user {}: {} used + {} anticipated > {} limit",
                    user_id, balance.used, ctx.anticipated_cost, balance.limit
                );
                #[cfg(feature = "metrics")]
                crate::metrics::record_quota_rejection();
                Err(OrchestratorError::QuotaExhausted {
                    user_id: user_id.to_string(),
                    used: balance.used,
                    anticipated: ctx.anticipated_cost,
                    limit: balance.limit,
                })
            }
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Could not read balance for user {} ({}), proceeding without pre-flight check", user_id, e);
                Ok(())
            }
        }
    }

    async fn on_success(
        &self,
        task_name: &str,
        ctx: &TaskContext,
        provider: ProviderType,
        response: &ProviderResponse,
        duration: Duration,
    ) -> u64 {
        self.tracker.record_response_metadata(provider, response.rate_limits.as_ref());
        let cost = credit_cost(&response.usage, self.tokens_per_credit);

        #[cfg(feature = "metrics")]
        {
            crate::metrics::record_attempt_success(provider, &response.model, task_name, duration, &response.usage);
            crate::metrics::set_provider_health(provider, self.tracker.is_healthy(provider, self.selector.reservation_fraction()));
        }

        let entry = self.log_entry(task_name, ctx, provider, response.model.clone(), response.usage, cost, None, duration);
        best_effort("append success usage log", self.usage_log.append(entry)).await;

        if cost > 0 {
            if let Some(user_id) = ctx.user_id.as_deref() {
                let label = format!("debit {} credit(s) from user {} (usage left unbilled)", cost, user_id);
                if best_effort(&label, self.balances.increment_usage(user_id, cost)).await.is_some() {
                    #[cfg(feature = "metrics")]
                    crate::metrics::record_credits_debited(cost);
                }
            }
        }

        let priority = self.selector.priority().get_priority().await;
        self.alerter.maybe_notify(&priority).await;

        cost
    }

    async fn on_failure(&self, task_name: &str, ctx: &TaskContext, provider: ProviderType, error: &ProviderError, duration: Duration) {
        #[cfg(feature = "metrics")]
        crate::metrics::record_attempt_failure(provider, task_name, error, duration);

        let entry = self.log_entry(
            task_name,
            ctx,
            provider,
            self.registry.model_for(provider),
            TokenUsage::default(),
            0,
            Some(error.to_string()),
            duration,
        );
        best_effort("append failed usage log", self.usage_log.append(entry)).await;
    }

    #[allow(clippy::too_many_arguments)]
    fn log_entry(
        &self,
        task_name: &str,
        ctx: &TaskContext,
        provider: ProviderType,
        model: String,
        usage: TokenUsage,
        cost: u64,
        error_message: Option<String>,
        duration: Duration,
    ) -> UsageLogEntry {
        UsageLogEntry {
            provider,
            model,
            task_name: task_name.to_string(),
            task_type: ctx.task_type.clone(),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cost,
            status: if error_message.is_none() { UsageStatus::Success } else { UsageStatus::Failed },
            error_message,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            user_id: ctx.user_id.clone(),
            brand_id: ctx.brand_id.clone(),
            article_id: ctx.article_id.clone(),
            created_at: Utc::now(),
        }
    }
}
