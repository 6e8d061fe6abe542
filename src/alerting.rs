//! Throttled operator alert when the whole provider pool is running low.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};

use crate::orchestrator::billing::best_effort;
use crate::providers::ProviderType;
use crate::rate_limit::RateTracker;
use crate::stores::{AdminNotification, NotificationChannel};

pub const ALERT_KIND: &str = "provider_capacity_low";

/// Sends at most one low-capacity alert per cooldown window
pub struct AdminAlerter {
    tracker: Arc<RateTracker>,
    notifier: Arc<dyn NotificationChannel>,
    admin_email: Option<String>,
    threshold: f64,
    cooldown: Duration,
    last_alert: Mutex<Option<DateTime<Utc>>>,
}

impl AdminAlerter {
    pub fn new(
        tracker: Arc<RateTracker>,
        notifier: Arc<dyn NotificationChannel>,
        admin_email: Option<String>,
        threshold: f64,
        cooldown: Duration,
    ) -> Self {
        Self {
            tracker,
            notifier,
            admin_email,
            threshold,
            cooldown,
            last_alert: Mutex::new(None),
        }
    }

    pub fn last_alert(&self) -> Option<DateTime<Utc>> {
        *self.last_alert.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every provider in `priority` has known quota below the threshold
    fn all_providers_low(&self, priority: &[ProviderType]) -> Option<Vec<(ProviderType, f64)>> {
        if priority.is_empty() {
            return None;
        }
        let mut levels = Vec::with_capacity(priority.len());
        for provider in priority {
            let fraction = self.tracker.remaining_token_fraction(*provider)?;
            if fraction > self.threshold {
                return None;
            }
            levels.push((*provider, fraction));
        }
        Some(levels)
    }

    /// Claim the throttle slot, returning false if an alert went out too recently
    fn claim_slot(&self, now: DateTime<Utc>) -> bool {
        let mut last_alert = self.last_alert.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(last) = *last_alert {
            if now - last < self.cooldown {
                return false;
            }
        }
        *last_alert = Some(now);
        true
    }

    /// Check pool capacity and notify if every provider is low.
    ///
    /// Returns whether an alert fired. Delivery failures are logged and never
    /// returned; the throttle is claimed before delivery is attempted.
    pub async fn maybe_notify(&self, priority: &[ProviderType]) -> bool {
        let Some(levels) = self.all_providers_low(priority) else {
            return false;
        };

        if !self.claim_slot(Utc::now()) {
            debug!("All providers below {:.0}% but an alert was sent recently", self.threshold * 100.0);
            return false;
        }

        let summary: Vec<String> = levels
            .iter()
            .map(|(provider, fraction)| format!("{}: {:.1}% tokens remaining", provider, fraction * 100.0))
            .collect();
        let title = "AI provider capacity low";
        let message = format!(
            "Every AI provider is below {:.0}% of its token quota. {}",
            self.threshold * 100.0,
            summary.join(", ")
        );
        warn!("{}", message);

        #[cfg(feature = "metrics")]
        crate::metrics::record_alert_fired();

        match &self.admin_email {
            Some(to) => {
                best_effort("send capacity alert email", self.notifier.send_email(to, title, &message)).await;
            }
            None => info!("No admin email configured, skipping capacity alert email"),
        }
        best_effort(
            "append capacity admin notification",
            self.notifier.append_admin_notification(AdminNotification::new(ALERT_KIND, title, message.clone())),
        )
        .await;

        true
    }
}
