//! Concurrency bulkhead.
//!
//! Caps in-flight remote calls. A caller that cannot get a slot queues for at
//! most `max_wait`, then fails with `BulkheadFull`.

use std::time::Duration;

use tokio::sync::{Semaphore, SemaphorePermit};

use conversion_types::{ConfigError, ResilienceError};

#[derive(Debug, Clone)]
pub struct BulkheadConfig {
    pub max_concurrent_calls: usize,
    pub max_wait: Duration,
}

impl Default for BulkheadConfig {
    fn default() -> Self {
        Self {
            max_concurrent_calls: 5,
            max_wait: Duration::from_secs(1),
        }
    }
}

impl BulkheadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_calls == 0 {
            return Err(ConfigError::invalid(
                "bulkhead.max_concurrent_calls",
                "must be at least 1",
            ));
        }
        if self.max_concurrent_calls > Semaphore::MAX_PERMITS {
            return Err(ConfigError::invalid(
                "bulkhead.max_concurrent_calls",
                format!("must not exceed {}", Semaphore::MAX_PERMITS),
            ));
        }
        Ok(())
    }
}

pub struct Bulkhead {
    semaphore: Semaphore,
    config: BulkheadConfig,
}

impl Bulkhead {
    pub fn new(config: BulkheadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            semaphore: Semaphore::new(config.max_concurrent_calls),
            config,
        })
    }

    /// Occupies one slot until the returned permit is dropped.
    ///
    /// The slot is released on every exit path of the caller, including
    /// cancellation.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, ResilienceError> {
        if let Ok(permit) = self.semaphore.try_acquire() {
            return Ok(permit);
        }

        match tokio::time::timeout(self.config.max_wait, self.semaphore.acquire()).await {
            Ok(Ok(permit)) => Ok(permit),
            // Elapsed, or the semaphore was closed (never happens here)
            _ => {
                tracing::debug!(max_wait = ?self.config.max_wait, "Bulkhead full");
                Err(ResilienceError::BulkheadFull {
                    max_wait: self.config.max_wait,
                })
            }
        }
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn max_concurrent_calls(&self) -> usize {
        self.config.max_concurrent_calls
    }
}
