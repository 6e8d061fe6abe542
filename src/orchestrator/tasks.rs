use serde::{Serialize, Deserialize};

use crate::constants;
use crate::orchestrator::executor::ExecutionOutcome;
use crate::providers::{ProviderRequest, ProviderType, TokenUsage};

/// How a task reacts when every provider failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// User-facing text; degrade to a placeholder instead of failing
    Generation,
    /// Structured data; no safe substitute, so failures propagate
    Analysis,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Generation => "generation",
            TaskKind::Analysis => "analysis",
        }
    }
}

/// Caller-supplied context for one orchestrated call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskContext {
    pub task_type: String,
    pub brand_id: Option<String>,
    pub article_id: Option<String>,
    pub user_id: Option<String>,
    /// Credits the caller expects to spend; checked before any provider is contacted
    pub anticipated_cost: u64,
}

impl TaskContext {
    pub fn new(task_type: impl Into<String>) -> Self {
        Self { task_type: task_type.into(), ..Default::default() }
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn article(mut self, article_id: impl Into<String>) -> Self {
        self.article_id = Some(article_id.into());
        self
    }

    pub fn anticipated_cost(mut self, credits: u64) -> Self {
        self.anticipated_cost = credits;
        self
    }
}

/// A named task and the generation parameters it uses with every provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub kind: TaskKind,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub json_output: bool,
    pub system: Option<String>,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, kind: TaskKind) -> Self {
        TaskDefinition {
            name: name.into(),
            kind,
            temperature: 0.7,
            max_tokens: None,
            json_output: false,
            system: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Context pre-filled with this task's type
    pub fn context(&self) -> TaskContext {
        TaskContext::new(self.kind.as_str())
    }

    /// Request sent to every provider for this task
    pub fn request(&self, prompt: impl Into<String>) -> ProviderRequest {
        ProviderRequest {
            prompt: prompt.into(),
            system: self.system.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_output: self.json_output,
        }
    }

    pub fn analyze_competitors() -> Self {
        TaskDefinition::new("analyze_competitors", TaskKind::Analysis)
            .with_temperature(0.3)
            .with_json_output()
            .with_system("You are an SEO analyst. Compare the competitor pages and report headings, keywords, content gaps and word counts as JSON.")
    }

    pub fn generate_outline() -> Self {
        TaskDefinition::new("generate_outline", TaskKind::Analysis)
            .with_temperature(0.5)
            .with_json_output()
            .with_max_tokens(2048)
            .with_system("You are an SEO content strategist. Produce an article outline as JSON.")
    }

    pub fn generate_article() -> Self {
        TaskDefinition::new("generate_article", TaskKind::Generation)
            .with_temperature(0.7)
            .with_max_tokens(8000)
            .with_system("You are an expert SEO copywriter. Write a complete, well-structured article in Markdown.")
    }

    pub fn generate_meta_title() -> Self {
        TaskDefinition::new("generate_meta_title", TaskKind::Generation)
            .with_temperature(0.5)
            .with_max_tokens(100)
            .with_system("Write one SEO meta title under 60 characters. Reply with the title only.")
    }

    pub fn generate_meta_description() -> Self {
        TaskDefinition::new("generate_meta_description", TaskKind::Generation)
            .with_temperature(0.5)
            .with_max_tokens(200)
            .with_system("Write one SEO meta description under 160 characters. Reply with the description only.")
    }
}

/// Result of `Orchestrator::run_task`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    pub content: String,
    pub provider: Option<ProviderType>,
    pub model: Option<String>,
    pub usage: TokenUsage,
    pub cost: u64,
    /// Placeholder content because every provider failed
    pub degraded: bool,
    pub error: Option<String>,
}

impl TaskOutput {
    pub fn from_outcome(outcome: ExecutionOutcome) -> Self {
        Self {
            content: outcome.response.content,
            provider: Some(outcome.provider),
            model: Some(outcome.response.model),
            usage: outcome.response.usage,
            cost: outcome.cost,
            degraded: false,
            error: None,
        }
    }

    pub fn placeholder(error: impl Into<String>) -> Self {
        Self {
            content: constants::PLACEHOLDER_CONTENT.to_string(),
            provider: None,
            model: None,
            usage: TokenUsage::default(),
            cost: 0,
            degraded: true,
            error: Some(error.into()),
        }
    }
}
