//! Retry policy and the executor that applies it to control-plane queries.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{PollError, QueryError};
use crate::ports::Sleeper;

/// Retry policy for control-plane queries.
///
/// Fixed delay between attempts, no backoff growth. Bounded by attempt
/// count only, never by wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub limit: u32,

    /// Delay before every retry.
    pub delay: Duration,
}

impl RetryPolicy {
    /// 5 attempts, 2s apart.
    pub fn fixed() -> Self {
        Self {
            limit: 5,
            delay: Duration::from_secs(2),
        }
    }

    /// Delay to wait after `attempts` failed attempts (1-indexed), or `None`
    /// when the budget is spent.
    pub fn next_delay(&self, attempts: u32) -> Option<Duration> {
        if attempts >= self.limit {
            None
        } else {
            Some(self.delay)
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed()
    }
}

/// Runs one query operation under a [`RetryPolicy`].
///
/// Every [`QueryError`] is retried the same way. When the budget runs out the
/// last error is returned as [`PollError::ExhaustedRetries`].
#[derive(Clone)]
pub struct RetryingExecutor {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryingExecutor {
    pub fn new(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<T, PollError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, QueryError>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let Some(delay) = self.policy.next_delay(attempts) else {
                tracing::error!(attempts, error = %err, "query failed, retries exhausted");
                return Err(PollError::ExhaustedRetries {
                    attempts,
                    last_error: err,
                });
            };

            tracing::warn!(
                attempt = attempts,
                limit = self.policy.limit,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "query failed, retrying"
            );
            self.sleeper.sleep(delay).await;
        }
    }
}
