use super::tracker_error::TrackerError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "release_readiness::jira";

/// Pacing and retry settings for outbound tracker requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed delay applied before every request
    pub min_delay: Duration,
    /// Retries after the first attempt; a call makes at most `max_retries + 1` requests
    pub max_retries: u32,
    /// Unit of the exponential backoff used when no retry-after hint is given
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (1-based): `2^attempt` units
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }

    /// Runs `request` with pacing and rate-limit retries
    ///
    /// Only `TrackerError::RateLimited` is retried. The wait before a retry is
    /// the server's retry-after hint when present, else the exponential
    /// backoff. Every wait and every request is abandoned as soon as `cancel`
    /// fires.
    ///
    /// # Errors
    /// - The first non rate-limit error, unchanged
    /// - `TrackerError::RetriesExhausted` once the retry ceiling is reached
    /// - `TrackerError::Cancelled` if `cancel` fires first
    pub async fn run<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut request: F,
    ) -> Result<T, TrackerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TrackerError>>,
    {
        let mut attempt = 0;
        loop {
            pause(cancel, self.min_delay).await?;

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TrackerError::Cancelled),
                outcome = request() => outcome,
            };
            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let retry_after = match &error {
                TrackerError::RateLimited { retry_after, .. } => *retry_after,
                _ => return Err(error),
            };

            if attempt >= self.max_retries {
                return Err(TrackerError::RetriesExhausted {
                    attempts: attempt + 1,
                    last: Box::new(error),
                });
            }

            attempt += 1;
            let wait = retry_after.unwrap_or_else(|| self.backoff(attempt));
            tracing::warn!(
                target: TRACING_TARGET,
                attempt,
                wait_ms = wait.as_millis() as u64,
                "rate limited, retrying"
            );
            pause(cancel, wait).await?;
        }
    }
}

/// Sleeps for `wait` unless `cancel` fires first
async fn pause(cancel: &CancellationToken, wait: Duration) -> Result<(), TrackerError> {
    if cancel.is_cancelled() {
        return Err(TrackerError::Cancelled);
    }
    if wait.is_zero() {
        return Ok(());
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TrackerError::Cancelled),
        _ = tokio::time::sleep(wait) => Ok(()),
    }
}
