use std::time::Duration;

use apuntes_core::constants::{
    DEFAULT_UPLOAD_BASE_DELAY_MS, DEFAULT_UPLOAD_MAX_ATTEMPTS, DEFAULT_UPLOAD_MAX_DELAY_MS,
};
use apuntes_core::Config;

/// Capped exponential backoff.
///
/// The delay before retry `n` (1-based) is `min(base_delay * 2^n, max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Always at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_UPLOAD_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_UPLOAD_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_UPLOAD_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.upload_max_attempts(),
            config.upload_base_delay(),
            config.upload_max_delay(),
        )
    }

    /// Delay applied before retry number `retry` (1 for the second attempt)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2_u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempts_made`
    pub fn allows_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }
}
