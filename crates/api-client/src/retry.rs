//! Transport-level retry policy
//!
//! Only the HTTP transport retries, and only for errors
//! [`ApiError::is_retryable`](crate::error::ApiError::is_retryable) accepts.
//! Status errors reported by the remote service are never retried.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add up to 25% random jitter to delays
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Short delays, for interactive use
    #[must_use]
    pub fn quick() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(400),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Long delays, for background syncs that must not give up early
    #[must_use]
    pub fn patient() -> Self {
        Self {
            max_attempts: 6,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Single attempt
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    /// Whether `error` on the 1-based `attempt` warrants another try
    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &ApiError) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }

    /// Delay before retry number `attempt`; zero for the first attempt
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        let delay_secs = base_delay.min(self.max_delay.as_secs_f64());

        let final_delay = if self.jitter {
            delay_secs * (1.0 + jitter_fraction() * 0.25)
        } else {
            delay_secs
        };

        Duration::from_secs_f64(final_delay)
    }
}

/// Pseudo-random value in `0.0..1.0`, drawn from a v4 UUID's random bits
fn jitter_fraction() -> f64 {
    let bucket = u16::try_from(Uuid::new_v4().as_u128() % 1024).unwrap_or(0);
    f64::from(bucket) / 1024.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: false,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_capped() {
        let config = RetryConfig {
            max_delay: Duration::from_millis(250),
            jitter: false,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(5), Duration::from_millis(250));
    }

    #[test]
    fn test_jitter_bounded() {
        let config = RetryConfig::default();
        let delay = config.delay_for_attempt(1);
        assert!(delay >= Duration::from_millis(100));
        assert!(delay <= Duration::from_millis(125));
    }

    #[test]
    fn test_no_retry() {
        let config = RetryConfig::no_retry();
        assert!(!config.should_retry(1, &ApiError::Timeout(Duration::from_secs(1))));
    }

    #[test]
    fn test_should_retry_only_transport_failures() {
        let config = RetryConfig::default();
        let timeout = ApiError::Timeout(Duration::from_secs(1));
        let status = ApiError::Status {
            code: 1002,
            request: "getSuppliers".into(),
            message: "error".into(),
        };

        assert!(config.should_retry(1, &timeout));
        assert!(!config.should_retry(3, &timeout));
        assert!(!config.should_retry(1, &status));
    }
}
