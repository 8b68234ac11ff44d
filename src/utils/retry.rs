//! Bounded retry for transient relay failures.
//!
//! Only the SMTP send goes through [`RetryPolicy::run`]; input validation is
//! never retried.

use crate::utils::error::{ContactError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Upper bound for a single backoff delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    Fixed,
    #[default]
    Exponential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            backoff: Backoff::Exponential,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff,
        }
    }

    /// 不重試，只執行一次
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Backoff::Fixed)
    }

    /// Delay before the retry following failed attempt `attempt` (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => {
                let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
                self.base_delay.checked_mul(factor).unwrap_or(MAX_RETRY_DELAY)
            }
        };
        delay.min(MAX_RETRY_DELAY)
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out.
    /// Returns the last error on failure.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!("✅ {} succeeded after {} retries", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(e) => {
                    attempt += 1;
                    if !e.is_transient() || attempt >= self.max_attempts {
                        tracing::error!(
                            "❌ {} failed after {} attempt(s): {}",
                            operation,
                            attempt,
                            e
                        );
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt - 1);
                    tracing::warn!(
                        "⚠️ {} attempt {}/{} failed: {} (retrying in {:?})",
                        operation,
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl Validate for RetryPolicy {
    fn validate(&self) -> Result<()> {
        validate_range("retry.max_attempts", self.max_attempts, 1, 10)?;
        if self.base_delay > MAX_RETRY_DELAY {
            return Err(ContactError::InvalidConfigValueError {
                field: "retry.delay_ms".to_string(),
                value: self.base_delay.as_millis().to_string(),
                reason: format!("Delay must not exceed {} ms", MAX_RETRY_DELAY.as_millis()),
            });
        }
        Ok(())
    }
}
