//! The fixed-order policy pipeline around one remote rate call.

use std::future::Future;

use conversion_types::{ConfigError, Rate, RemoteError, ResilienceError};

use super::{
    AttemptFailure, Bulkhead, BulkheadConfig, CircuitBreaker, CircuitBreakerConfig,
    RateLimiterConfig, RateLimiterPolicy, RetryConfig, RetryPolicy,
};

/// Parameters of every policy. Defaults match the production profile.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfiguration {
    pub rate_limiter: RateLimiterConfig,
    pub bulkhead: BulkheadConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub retry: RetryConfig,
}

impl PolicyConfiguration {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rate_limiter.validate()?;
        self.bulkhead.validate()?;
        self.circuit_breaker.validate()?;
        self.retry.validate()?;
        Ok(())
    }
}

/// Shared, process-wide policy state.
///
/// One instance guards the one remote dependency; share it across requests
/// behind the service.
pub struct ResilienceStack {
    rate_limiter: RateLimiterPolicy,
    bulkhead: Bulkhead,
    circuit_breaker: CircuitBreaker,
    retry: RetryPolicy,
}

impl ResilienceStack {
    pub fn new(config: PolicyConfiguration) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rate_limiter: RateLimiterPolicy::new(config.rate_limiter)?,
            bulkhead: Bulkhead::new(config.bulkhead)?,
            circuit_breaker: CircuitBreaker::new(config.circuit_breaker)?,
            retry: RetryPolicy::new(config.retry)?,
        })
    }

    /// Runs `remote` under rate limiter → bulkhead → circuit breaker → retry.
    ///
    /// A rejecting layer short-circuits everything inside it. The breaker
    /// admits the call as a whole, and each retry attempt records its own
    /// outcome and must be re-admitted, so a circuit that opens mid-retry
    /// stops the remaining attempts.
    pub async fn protected_call<F, Fut>(&self, mut remote: F) -> Result<Rate, ResilienceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Rate, RemoteError>>,
    {
        self.rate_limiter.acquire().await?;
        let _slot = self.bulkhead.acquire().await?;
        let mut admitted = Some(self.circuit_breaker.try_acquire()?);

        let breaker = &self.circuit_breaker;
        self.retry
            .execute(|_| {
                let attempt = match admitted.take().map_or_else(|| breaker.try_acquire(), Ok) {
                    Ok(permit) => Ok((permit, remote())),
                    Err(err) => Err(AttemptFailure::Rejected(err)),
                };
                async move {
                    let (permit, call) = match attempt {
                        Ok(ready) => ready,
                        Err(rejected) => return Err(rejected),
                    };
                    match call.await {
                        Ok(rate) => {
                            permit.record_success();
                            Ok(rate)
                        }
                        Err(err) => {
                            permit.record_failure();
                            Err(AttemptFailure::Remote(err))
                        }
                    }
                }
            })
            .await
    }

    pub fn rate_limiter(&self) -> &RateLimiterPolicy {
        &self.rate_limiter
    }

    pub fn bulkhead(&self) -> &Bulkhead {
        &self.bulkhead
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}
