//! Rate limiting between paginated calls
//!
//! A fixed pause plus a uniformly random addend, so request timing is not
//! regular enough to trip server-side throttling.

use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Minimum wait between calls
    pub base_pause: Duration,
    /// Upper bound (exclusive) of the random addend
    pub jitter: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            base_pause: Duration::from_secs(3),
            jitter: Duration::from_secs(1),
        }
    }
}

impl RateLimiterConfig {
    /// Create a config with the given base pause and the default 1s jitter
    pub fn new(base_pause: Duration) -> Self {
        Self {
            base_pause,
            ..Default::default()
        }
    }

    /// Override the jitter range
    #[must_use]
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// No waiting at all
    pub fn disabled() -> Self {
        Self {
            base_pause: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }
}

/// Jittered pause between paginated calls
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: RateLimiterConfig) -> Self {
        Self { config }
    }

    /// Rate limiter that never waits
    pub fn disabled() -> Self {
        Self::new(RateLimiterConfig::disabled())
    }

    /// Get the configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Draw the next wait: `base_pause + jitter * U[0, 1)`
    pub fn delay(&self) -> Duration {
        let fraction: f64 = rand::thread_rng().gen();
        self.config
            .base_pause
            .saturating_add(self.config.jitter.mul_f64(fraction))
    }

    /// Sleep for one drawn delay
    pub async fn wait(&self) {
        let delay = self.delay();
        if delay.is_zero() {
            return;
        }
        debug!("Pausing {:?} before next request", delay);
        tokio::time::sleep(delay).await;
    }
}
