//! Failover executor and everything it needs per call: task context,
//! credit accounting and the builder that wires the collaborators.

pub mod billing;
pub mod builder;
pub mod executor;
pub mod tasks;

pub use billing::{best_effort, credit_cost};
pub use builder::OrchestratorBuilder;
pub use executor::{ExecutionOutcome, Orchestrator};
pub use tasks::{TaskContext, TaskDefinition, TaskKind, TaskOutput};
