//! Bounded exponential backoff
//!
//! [`with_retry`] wraps one remote call. A classifier decides which
//! failures are worth another attempt; by default only transport failures
//! ([`Error::is_transient`]) are. Anything else, including every non-2xx
//! response, is returned on first occurrence.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Growth per attempt
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Policy that performs a single attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the attempt budget
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the base and maximum delay
    #[must_use]
    pub fn with_delays(mut self, base: Duration, max: Duration) -> Self {
        self.base_delay = base;
        self.max_delay = max;
        self
    }

    /// Delay between attempt `attempt` and `attempt + 1` (1-based).
    ///
    /// `min(max_delay, base_delay * backoff_factor^(attempt - 1))`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let base_ms = self.base_delay.as_secs_f64() * 1000.0;
        let delay_ms = base_ms * self.backoff_factor.powi(exponent);
        let capped_ms = delay_ms.min(self.max_delay.as_secs_f64() * 1000.0);
        Duration::from_micros((capped_ms * 1000.0) as u64)
    }
}

/// Run `operation` under `policy`, retrying failures `classify` accepts.
///
/// After the budget is spent the last error is returned unchanged; callers
/// only learn that retries happened from the WARN events.
pub async fn with_retry<T, F, Fut, C>(
    policy: &RetryPolicy,
    operation_name: &str,
    classify: C,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&Error) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if !classify(&err) {
                    return Err(err);
                }

                if attempt >= max_attempts {
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts,
                        error = %err,
                        "giving up after retries"
                    );
                    return Err(err);
                }

                let delay = policy.delay_after(attempt);
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// [`with_retry`] using the default transport-only classifier
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    with_retry(policy, operation_name, Error::is_transient, operation).await
}
