//! Retry with exponential backoff, split by request kind.
//!
//! Reads are retried on connectivity failures and 5xx. Writes are retried
//! only when the connection was never established, so a write that may have
//! reached the backend is never sent twice.

use std::future::Future;
use std::time::Duration;

use neraca_shared::config::ApiConfig;
use rand::Rng;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::ClientError;

/// Whether a request only reads or may change backend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// GET requests, including the Neraca Balance calculation.
    Read,
    /// Ledger submission, posting actions, logout.
    Write,
}

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Backoff before the first retry; doubles for each further retry.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Whether to add up to 25% random jitter.
    pub add_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
            add_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Builds the policy from the API configuration.
    #[must_use]
    pub fn from_api(config: &ApiConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: config.retry_backoff(),
            ..Self::default()
        }
    }

    /// A config with no retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt + 1`.
    pub(crate) fn backoff_duration(&self, attempt: u32) -> Duration {
        let initial = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let cap = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let backoff_ms = initial.saturating_mul(factor).min(cap);

        let jitter_ms = if self.add_jitter && backoff_ms >= 4 {
            rand::rng().random_range(0..=backoff_ms / 4)
        } else {
            0
        };

        Duration::from_millis(backoff_ms.saturating_add(jitter_ms))
    }
}

/// Runs `f` until it succeeds, fails with an error that is not retryable for
/// `kind`, or runs out of retries.
pub async fn retry_request<F, Fut, T>(
    config: &RetryConfig,
    kind: RequestKind,
    operation: &str,
    f: F,
) -> Result<T, ClientError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => {
                if attempt > 0 {
                    info!(
                        operation,
                        attempt = attempt + 1,
                        "Request succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) => {
                if !err.is_retryable(kind) {
                    warn!(
                        operation,
                        ?kind,
                        code = err.error_code(),
                        error = %err,
                        "Request failed, not retrying"
                    );
                    return Err(err);
                }

                if attempt >= config.max_retries {
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        code = err.error_code(),
                        error = %err,
                        "Request failed after max retries"
                    );
                    return Err(err);
                }

                let backoff = config.backoff_duration(attempt);
                warn!(
                    operation,
                    attempt = attempt + 1,
                    code = err.error_code(),
                    error = %err,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    "Request failed, retrying after backoff"
                );

                sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}
