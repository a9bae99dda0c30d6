//! Anti-burst pacing between page requests
//!
//! After every page that yielded listings the walker waits a uniformly random delay before
//! its next request. Each worker owns its own `Pacer`, so the delay applies per browser
//! session.

use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;

/// Random delay source bounded by `[min, max]` milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    min_ms: u64,
    max_ms: u64,
}

impl Pacer {
    /// Creates a pacer; the bounds are swapped if given in the wrong order
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    /// A pacer that never waits
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    /// Draws the next delay
    pub fn next_delay(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// Sleeps for a freshly drawn delay
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::debug!("Pausing {}ms before next request", delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}
