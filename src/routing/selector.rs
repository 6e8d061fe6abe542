use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};

use crate::providers::ProviderType;
use crate::rate_limit::RateTracker;
use crate::routing::priority::ModelPriority;

/// Picks the next provider to try for a task
///
/// Two phases: the first untried provider in priority order that the tracker
/// considers healthy; failing that, the least exhausted untried provider.
/// Selection never refuses just because every provider looks low.
pub struct Selector {
    priority: Arc<ModelPriority>,
    tracker: Arc<RateTracker>,
    reservation_fraction: f64,
}

impl Selector {
    pub fn new(priority: Arc<ModelPriority>, tracker: Arc<RateTracker>, reservation_fraction: f64) -> Self {
        Self { priority, tracker, reservation_fraction }
    }

    pub fn priority(&self) -> &ModelPriority {
        &self.priority
    }

    pub fn reservation_fraction(&self) -> f64 {
        self.reservation_fraction
    }

    /// Next provider not in `attempted`, or `None` once every provider was tried
    pub async fn select_next(&self, attempted: &HashSet<ProviderType>) -> Option<ProviderType> {
        let order = self.priority.get_priority().await;
        select_from(&order, attempted, &self.tracker, self.reservation_fraction)
    }
}

/// Selection over an explicit priority list
pub fn select_from(
    order: &[ProviderType],
    attempted: &HashSet<ProviderType>,
    tracker: &RateTracker,
    reservation_fraction: f64,
) -> Option<ProviderType> {
    let candidates: Vec<ProviderType> = order.iter().copied().filter(|p| !attempted.contains(p)).collect();
    if candidates.is_empty() {
        return None;
    }

    if let Some(provider) = candidates.iter().copied().find(|p| tracker.is_healthy(*p, reservation_fraction)) {
        debug!("Selector: {} is healthy, selecting it", provider);
        return Some(provider);
    }

    let mut best: Option<(ProviderType, u64)> = None;
    for provider in &candidates {
        if let Some(remaining) = tracker.remaining_tokens(*provider) {
            if best.map_or(true, |(_, best_remaining)| remaining > best_remaining) {
                best = Some((*provider, remaining));
            }
        }
    }

    match best {
        Some((provider, remaining)) => {
            warn!(
                "Selector: no healthy provider among {:?}, falling back to least exhausted {} ({} tokens left)",
                candidates, provider, remaining
            );
            Some(provider)
        }
        None => {
            debug!("Selector: no quota data for {:?}, selecting first untried", candidates);
            candidates.first().copied()
        }
    }
}
