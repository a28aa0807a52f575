use std::time::Duration;

use crate::platform::Quota;

/// Suspends the crawl while the remote quota is at or below a safety margin.
#[derive(Debug, Clone)]
pub struct RatePacer {
    safety_margin: u32,
    cooldown: Duration,
}

impl RatePacer {
    pub fn new(safety_margin: u32, cooldown: Duration) -> Self {
        Self {
            safety_margin,
            cooldown,
        }
    }

    pub fn safety_margin(&self) -> u32 {
        self.safety_margin
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn must_cool_down(&self, quota: &Quota) -> bool {
        quota.remaining <= self.safety_margin
    }

    /// Sleep for the fixed cooldown if the quota is scarce. The quota is not
    /// re-checked during or after the sleep. Returns whether it slept.
    pub async fn pace(&self, quota: Quota) -> bool {
        if !self.must_cool_down(&quota) {
            return false;
        }
        match quota.reset_at {
            Some(reset) => log::warn!(
                "Quota low ({}/{} left, resets {}); cooling down for {:?}",
                quota.remaining,
                quota.limit,
                reset.format("%Y-%m-%d %H:%M:%S"),
                self.cooldown
            ),
            None => log::warn!(
                "Quota low ({}/{} left); cooling down for {:?}",
                quota.remaining,
                quota.limit,
                self.cooldown
            ),
        }
        tokio::time::sleep(self.cooldown).await;
        true
    }
}
