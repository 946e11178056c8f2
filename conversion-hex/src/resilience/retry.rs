//! Fixed-delay retry.

use std::future::Future;
use std::time::Duration;

use conversion_types::{ConfigError, RemoteError, ResilienceError};

/// Retries every remote failure.
pub fn retry_all(_: &RemoteError) -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub wait: Duration,
    /// Failures for which another attempt is made. Others end the call with
    /// `RemoteCallFailed`. Set to `RemoteError::is_retryable` to stop early
    /// on 4xx and bad payloads.
    pub retry_on: fn(&RemoteError) -> bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait: Duration::from_secs(1),
            retry_on: retry_all,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("retry.max_attempts", "must be at least 1"));
        }
        Ok(())
    }
}

/// Why a single attempt did not produce a value.
#[derive(Debug)]
pub enum AttemptFailure {
    /// The attempt was refused before reaching the remote. Stops retrying.
    Rejected(ResilienceError),
    /// The remote call ran and failed.
    Remote(RemoteError),
}

pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs `attempt` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `attempt` receives the 1-based attempt number.
    pub async fn execute<T, F, Fut>(&self, mut attempt: F) -> Result<T, ResilienceError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AttemptFailure>>,
    {
        let mut number = 1;
        loop {
            let err = match attempt(number).await {
                Ok(value) => return Ok(value),
                Err(AttemptFailure::Rejected(err)) => return Err(err),
                Err(AttemptFailure::Remote(err)) => err,
            };

            if !(self.config.retry_on)(&err) {
                tracing::debug!(attempt = number, error = %err, "Remote failure is not retryable");
                return Err(ResilienceError::RemoteCallFailed(err));
            }

            if number >= self.config.max_attempts {
                return Err(ResilienceError::RetryExhausted {
                    attempts: number,
                    source: err,
                });
            }

            tracing::debug!(
                attempt = number,
                max_attempts = self.config.max_attempts,
                wait = ?self.config.wait,
                error = %err,
                "Retrying remote call"
            );
            tokio::time::sleep(self.config.wait).await;
            number += 1;
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}
