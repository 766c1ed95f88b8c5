//! Retry logic for network operations with error classification and
//! exponential backoff.

use std::time::Duration;

use anyhow::Result;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use super::error::{ApiError, Cancelled};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// Delay before the first retry in milliseconds; doubled on every retry.
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;

/// How many times, and how patiently, a failed request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Upper bound on calls made for one request.
    pub fn max_attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }

    /// Backoff before retry number `attempt + 1` (0-based failed attempt).
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = u32::try_from(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(2u32.saturating_pow(exponent))
    }
}

/// Returns true when the error may go away on a retry.
///
/// Client errors (4xx), malformed JSON and cancellation fail fast; transport
/// failures, server errors (5xx) and anything unclassified are retried.
pub fn is_retryable(e: &anyhow::Error) -> bool {
    if e.downcast_ref::<Cancelled>().is_some() {
        return false;
    }

    if let Some(api_error) = e.downcast_ref::<ApiError>() {
        return !api_error.is_client_error();
    }

    if e.downcast_ref::<serde_json::Error>().is_some() {
        return false;
    }

    if let Some(transport) = e.downcast_ref::<reqwest::Error>() {
        return !(transport.is_decode() || transport.is_builder());
    }

    true
}

/// Executes an async operation with retry logic.
///
/// The operation runs at most `policy.max_attempts()` times. The cancellation
/// token is checked before every attempt and before every backoff sleep, and
/// both the attempt and the sleep race it, so a cancelled request stops with
/// [`Cancelled`] instead of working through the remaining retries.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0usize;

    loop {
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Cancelled.into()),
            result = operation() => result,
        };

        let e = match result {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !is_retryable(&e) {
            debug!("{}: non-retryable error: {}", operation_name, e);
            return Err(e);
        }

        if attempt >= policy.max_retries {
            debug!(
                "{}: giving up after {} attempt(s)",
                operation_name,
                policy.max_attempts()
            );
            return Err(e);
        }

        let delay = policy.delay_for(attempt);
        warn!(
            "{}: attempt {}/{} failed ({}), retrying in {}ms...",
            operation_name,
            attempt + 1,
            policy.max_attempts(),
            e,
            delay.as_millis()
        );

        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Cancelled.into()),
            _ = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
    }
}
