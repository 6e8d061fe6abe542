//! `seoaaa-orchestrator` is the AI orchestration core of the SEOAAA article
//! platform: a rate-limit-aware, multi-provider failover executor for Groq,
//! Gemini, DeepSeek and Claude.
//!
//! Every AI task goes through one [`Orchestrator`], which checks the caller's
//! credit balance, picks providers in the operator's priority order while
//! skipping those close to their quota, fails over one provider at a time,
//! writes a usage log entry for every attempt and debits the user once.
//!
//! # Features
//!
//! - **Failover**: sequential attempts across providers until one succeeds
//! - **Rate-limit tracking**: quota headers feed a shared tracker that steers selection
//! - **Persisted priority**: operators reorder providers at runtime through a settings store
//! - **Credit billing**: pre-flight balance check and a single debit per task
//! - **Capacity alerts**: throttled admin notification when every provider runs low
//! - **Metrics**: optional `metrics` feature
//!
//! # Example
//!
//! ```no_run
//! use seoaaa_orchestrator::{Orchestrator, ProviderType, TaskDefinition};
//!
//! async fn example() {
//!     let orchestrator = Orchestrator::builder()
//!         .add_provider(ProviderType::Groq, "llama-3.3-70b-versatile", "groq-key")
//!         .add_provider(ProviderType::Claude, "", "anthropic-key")
//!         .admin_email("ops@example.com")
//!         .build()
//!         .expect("Failed to build orchestrator");
//!
//!     let task = TaskDefinition::generate_meta_title();
//!     let ctx = task.context().user("user-1").article("article-9").anticipated_cost(1);
//!
//!     let output = orchestrator
//!         .run_task(&task, "Title for an article about sourdough starters", &ctx)
//!         .await
//!         .expect("task failed");
//!     println!("{}", output.content);
//! }
//! ```

pub mod providers;
pub mod errors;
pub mod constants;
pub mod rate_limit;
pub mod routing;
pub mod orchestrator;
pub mod alerting;
pub mod stores;
pub mod config;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use providers::{
    ProviderType,
    ProviderRequest,
    ProviderResponse,
    ProviderAdapter,
    ProviderRegistry,
    TokenUsage,
    create_adapter,
    GroqAdapter,
    GeminiAdapter,
    DeepSeekAdapter,
    ClaudeAdapter,
};

pub use errors::{OrchestratorError, OrchestratorResult, ProviderError, ProviderResult, StoreError, StoreResult};

pub use orchestrator::{
    Orchestrator,
    OrchestratorBuilder,
    ExecutionOutcome,
    TaskContext,
    TaskDefinition,
    TaskKind,
    TaskOutput,
};

pub use rate_limit::{RateLimitMetadata, RateTracker};
pub use routing::{ModelPriority, Selector};
pub use alerting::AdminAlerter;
pub use stores::{InMemoryStore, JsonFileStore, LogNotifier};

#[cfg(feature = "metrics")]
pub use metrics::describe_metrics;

/// Initialize the logging system
///
/// This should be called at the start of your application in case
/// you want to activate the library's debug and info logging.
pub fn use_logging() {
    env_logger::init();
}
