//! Retry and timeout wrappers for async network calls.
//!
//! The two compose in either order:
//! `with_timeout(retry_with_backoff(op, ..), ..)` bounds the whole retry
//! sequence, while retrying a `with_timeout` call bounds each attempt.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinError;
use tracing::{error, warn};

/// Retry policy for [`retry_with_backoff`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

/// Run `operation` until it succeeds or `max_retries` retries are spent.
///
/// Waits `initial_delay`, then twice that, and so on between attempts, for
/// `max_retries + 1` attempts in total. No jitter and no delay cap. The last
/// failure is returned as-is.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    max_retries: u32,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut retries_left = max_retries;
    let mut delay = initial_delay;
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if retries_left == 0 => return Err(e),
            Err(e) => {
                warn!(
                    "Attempt {} failed: {}. Retrying in {:?} ({} retries left)",
                    attempt, e, delay, retries_left
                );
                tokio::time::sleep(delay).await;
                retries_left -= 1;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
        }
    }
}

/// [`retry_with_backoff`] driven by a [`RetryConfig`]
pub async fn retry_with_config<F, Fut, T, E>(operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_backoff(operation, config.max_retries, config.initial_delay).await
}

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError<E> {
    #[error("Operation timed out after {0:?}")]
    Elapsed(Duration),

    /// The runtime cancelled the operation's task, e.g. during shutdown
    #[error("Operation was cancelled")]
    Cancelled,

    #[error("{0}")]
    Inner(E),
}

impl<E> TimeoutError<E> {
    pub fn is_elapsed(&self) -> bool {
        matches!(self, TimeoutError::Elapsed(_))
    }
}

/// Race `operation` against a `timeout` deadline.
///
/// The operation runs as its own task. When the deadline wins, the task is
/// detached rather than aborted: it may still finish in the background, and
/// its result is discarded.
pub async fn with_timeout<Fut, T, E>(operation: Fut, timeout: Duration) -> Result<T, TimeoutError<E>>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let handle = tokio::spawn(operation);

    tokio::select! {
        joined = handle => join_outcome(joined),
        _ = tokio::time::sleep(timeout) => Err(TimeoutError::Elapsed(timeout)),
    }
}

/// Panics in the operation propagate to the caller; cancellation does not.
fn join_outcome<T, E>(joined: Result<Result<T, E>, JoinError>) -> Result<T, TimeoutError<E>> {
    match joined {
        Ok(result) => result.map_err(TimeoutError::Inner),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            error!("Timed operation did not complete: {}", e);
            Err(TimeoutError::Cancelled)
        }
    }
}
