//! Retry policy for site fetches.

use std::time::Duration;

use rand::Rng;

/// Configurable retry policy: attempt count, linear backoff, and jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of fetch attempts.
    pub max_attempts: u32,
    /// Base delay between attempts, scaled by the attempt number.
    pub base_delay: Duration,
    /// Upper bound for the random jitter added to each delay.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Policy with no waiting between attempts (tests, local mocks).
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// Delay to sleep after a failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.base_delay.saturating_mul(attempt);
        if self.jitter.is_zero() {
            return backoff;
        }
        let jitter_ms = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
        backoff + Duration::from_millis(jitter_ms)
    }
}
