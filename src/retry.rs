// src/retry.rs
//! Retry policy shared by all mutating backend calls.

use crate::error::ApiError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fixed-backoff retry policy. Schedule field saves run with two attempts
/// and a 400ms pause (covers transient network/CORS preflight races);
/// invites and status emails run with a single attempt so a failure stays
/// terminal per invocation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub fn retry_once_after(backoff: Duration) -> Self {
        Self {
            max_attempts: 2,
            backoff,
        }
    }

    /// Run `op` until it succeeds or attempts are exhausted. Authentication
    /// failures abort immediately regardless of remaining attempts.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && err.is_retryable() => {
                    warn!(
                        "Attempt {}/{} failed, retrying after {:?}: {}",
                        attempt, self.max_attempts, self.backoff, err
                    );
                    tokio::time::sleep(self.backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn transient_failure_then_success_makes_two_calls() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::retry_once_after(Duration::from_millis(400));

        let result = policy
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ApiError::Network("connection reset".into()))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn two_failures_make_exactly_two_calls() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::retry_once_after(Duration::from_millis(400));

        let result: Result<(), ApiError> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Network("still down".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_is_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::retry_once_after(Duration::from_millis(400));

        let result: Result<(), ApiError> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Unauthorized)
            })
            .await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_never_retries() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::single_attempt();

        let result: Result<(), ApiError> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Service("mailer offline".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
