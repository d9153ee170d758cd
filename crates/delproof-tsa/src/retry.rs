//! Bounded retry around any timestamp authority
//!
//! Only transient failures (`ExErrorKind::TsaUnavailable`) are retried.
//! Rejections and protocol errors come back on the first attempt.

use delproof_core::errors::ExError;
use delproof_core::{TimestampAuthority, TimestampToken};
use std::time::Duration;

/// Retry schedule with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; 1 disables retrying
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before attempt `attempt + 1`, for `attempt >= 1`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

pub struct RetryingTimestampAuthority<A> {
    inner: A,
    policy: RetryPolicy,
}

impl<A: TimestampAuthority> RetryingTimestampAuthority<A> {
    pub fn new(inner: A, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: TimestampAuthority> TimestampAuthority for RetryingTimestampAuthority<A> {
    fn request_timestamp(&self, digest_hex: &str) -> Result<TimestampToken, ExError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.request_timestamp(digest_hex) {
                Ok(token) => return Ok(token),
                Err(err) if err.kind().is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        backoff_ms = delay.as_millis() as u64,
                        err.code = err.code(),
                        message = err.message(),
                        "timestamp request failed, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
