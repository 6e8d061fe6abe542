//! Credit accounting and the best-effort policy for side effects.

use std::future::Future;

use log::error;

use crate::errors::StoreResult;
use crate::providers::TokenUsage;

/// Credits charged for a call: `ceil(total_tokens / tokens_per_credit)`
pub fn credit_cost(usage: &TokenUsage, tokens_per_credit: u64) -> u64 {
    usage.total().div_ceil(tokens_per_credit.max(1))
}

/// Run a side effect whose failure must not change the task outcome.
///
/// Errors are logged under `label` and turned into `None`. Every audit,
/// billing and notification write goes through here.
pub async fn best_effort<T, F>(label: &str, side_effect: F) -> Option<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match side_effect.await {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Best-effort side effect '{}' failed: {}", label, e);
            None
        }
    }
}
