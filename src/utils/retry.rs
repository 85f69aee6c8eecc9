// ABOUTME: Retry policy with bounded attempts, exponential backoff and an overall deadline
// ABOUTME: Provides retry for transient failures and poll_until for waiting on a condition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::future::Future;
use std::time::{Duration, Instant};

use strikelog_core::constants::retry::BACKOFF_MULTIPLIER;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::errors::{AppError, AppResult};

/// Bounded retry policy
///
/// Attempt `n` (1-based) waits `initial_backoff * multiplier^(n-1)`, capped
/// at `max_backoff`. No attempt starts once `max_elapsed` has passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
    max_elapsed: Duration,
    multiplier: f64,
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` of 0 is treated as 1
    #[must_use]
    pub fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        max_elapsed: Duration,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
            max_elapsed,
            multiplier: BACKOFF_MULTIPLIER,
        }
    }

    /// Maximum attempts including the first
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Overall deadline
    #[must_use]
    pub const fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    /// Delay after the given failed attempt (1-based)
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let millis = self.initial_backoff.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_backoff.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Run `operation` until it succeeds, retrying transient errors
    ///
    /// # Errors
    ///
    /// Returns the first non-transient error, or the last error once the
    /// attempts or the deadline are used up
    pub async fn retry<F, Fut, T>(&self, operation: &str, f: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        self.retry_if(operation, AppError::is_transient, f).await
    }

    /// Run `operation` until it succeeds, retrying errors `should_retry` accepts
    ///
    /// # Errors
    ///
    /// Returns the first error `should_retry` rejects, or the last error once
    /// the attempts or the deadline are used up
    pub async fn retry_if<P, F, Fut, T>(
        &self,
        operation: &str,
        should_retry: P,
        mut f: F,
    ) -> AppResult<T>
    where
        P: Fn(&AppError) -> bool,
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let started = Instant::now();
        let mut attempt = 0;
        loop {
            attempt += 1;
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) if !should_retry(&e) => {
                    debug!(operation, attempt, error = %e, "Failure is not retryable");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.backoff_for(attempt);
                    if attempt >= self.max_attempts || started.elapsed() + delay > self.max_elapsed
                    {
                        warn!(operation, attempt, error = %e, "Giving up after retries");
                        return Err(e);
                    }
                    debug!(
                        operation,
                        attempt,
                        backoff_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Retrying after failure"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// Poll `check` until it returns `true`
    ///
    /// Transient errors from `check` count as "not yet".
    ///
    /// # Errors
    ///
    /// Returns a `Timeout` error once the attempts or the deadline are used
    /// up, or the first non-transient error from `check`
    pub async fn poll_until<F, Fut>(&self, condition: &str, mut check: F) -> AppResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<bool>>,
    {
        let started = Instant::now();
        let mut attempt = 0;
        loop {
            attempt += 1;
            match check().await {
                Ok(true) => {
                    debug!(condition, attempt, "Condition satisfied");
                    return Ok(());
                }
                Ok(false) => {}
                Err(e) if e.is_transient() => {
                    debug!(condition, attempt, error = %e, "Transient failure while polling");
                }
                Err(e) => return Err(e),
            }

            let delay = self.backoff_for(attempt);
            if attempt >= self.max_attempts || started.elapsed() + delay > self.max_elapsed {
                warn!(condition, attempt, "Condition not met before deadline");
                return Err(AppError::timeout(format!(
                    "Timed out waiting for {condition} after {attempt} attempts"
                )));
            }
            sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            config.initial_backoff,
            config.max_backoff,
            config.max_elapsed,
        )
    }
}
