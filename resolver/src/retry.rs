//! Bounded retry with optional exponential backoff.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::KbError;

/// How often and how patiently a failing knowledge-base call is repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Double the delay after every retry.
    #[serde(default = "default_true")]
    pub exponential_backoff: bool,
    /// Upper bound on a single delay, in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            exponential_backoff: true,
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// The error a call ended with, and how many attempts were spent on it.
#[derive(Debug)]
pub struct Exhausted {
    /// Attempts made, including the first.
    pub attempts: u32,
    /// The last error.
    pub error: KbError,
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (zero-based).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let ms = if self.exponential_backoff {
            self.backoff_ms
                .saturating_mul(2u64.saturating_pow(retry))
        } else {
            self.backoff_ms
        };
        Duration::from_millis(ms.min(self.max_backoff_ms))
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent.
    ///
    /// # Errors
    ///
    /// Returns the last error together with the number of attempts made.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, Exhausted>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, KbError>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempts <= self.max_retries => {
                    let delay = self.delay(attempts - 1);
                    warn!(%operation, attempts, delay_ms = delay.as_millis() as u64, %error, "retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(Exhausted { attempts, error }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn unavailable() -> KbError {
        KbError::Status {
            operation: "test".into(),
            status: 503,
            body: String::new(),
        }
    }

    #[test]
    fn exponential_delays_are_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            backoff_ms: 100,
            exponential_backoff: true,
            max_backoff_ms: 1_000,
        };
        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(400));
        assert_eq!(policy.delay(9), Duration::from_millis(1_000));
        let flat = RetryPolicy {
            exponential_backoff: false,
            ..policy
        };
        assert_eq!(flat.delay(5), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_from_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = RetryPolicy::default()
            .run("fetch Q1", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(unavailable())
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result.ok(), Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_budget() {
        let policy = RetryPolicy {
            max_retries: 2,
            ..RetryPolicy::default()
        };
        let err = policy
            .run("fetch Q1", || async { Err::<(), _>(unavailable()) })
            .await
            .expect_err("always failing");
        assert_eq!(err.attempts, 3);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let err = RetryPolicy::default()
            .run("fetch Q1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(KbError::Decode {
                    operation: "fetch Q1".into(),
                    message: "not JSON".into(),
                })
            })
            .await
            .expect_err("permanent failure");
        assert_eq!(err.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
