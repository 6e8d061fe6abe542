//! Configuration module for TOML-based orchestrator configuration.
//!
//! Lets an `Orchestrator` be configured from a file instead of the builder
//! methods.
//!
//! # Example Configuration File
//!
//! ```toml
//! [settings]
//! reservation_fraction = 0.4
//! alert_threshold = 0.3
//! alert_cooldown_secs = 3600
//! tokens_per_credit = 1000
//! admin_email = "ops@example.com"
//! default_priority = ["groq", "gemini", "deepseek", "claude"]
//!
//! [[providers]]
//! type = "groq"
//! model = "llama-3.3-70b-versatile"
//! api_key = "${GROQ_API_KEY}"
//! ```
//!
//! # Environment Variables
//!
//! API keys, endpoints and the admin email can reference environment
//! variables using the `${VAR_NAME}` syntax. These are resolved at load time.

mod types;
mod loader;

pub use types::{Config, Settings, ProviderConfig};
pub use loader::{load_config, parse_config};
