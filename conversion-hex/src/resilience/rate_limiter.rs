//! Rate limiting policy using Governor.
//!
//! Admits a remote call only if a permit is available within the configured
//! acquire timeout. Evaluated first so an overloaded caller never takes a
//! bulkhead slot or touches the breaker's statistics.

use std::{num::NonZeroU32, time::Duration};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

use conversion_types::{ConfigError, ResilienceError};

/// Rate limiter parameters.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Permits available per window (also the burst size).
    pub permits_per_window: u32,
    /// Time over which `permits_per_window` are replenished.
    pub window: Duration,
    /// Longest a caller may wait for a permit before failing.
    pub acquire_timeout: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            permits_per_window: 2,
            window: Duration::from_secs(10),
            acquire_timeout: Duration::from_millis(1),
        }
    }
}

impl RateLimiterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.permits_per_window == 0 {
            return Err(ConfigError::invalid(
                "rate_limiter.permits_per_window",
                "must be at least 1",
            ));
        }
        if self.window.is_zero() {
            return Err(ConfigError::invalid("rate_limiter.window", "must be non-zero"));
        }
        Ok(())
    }
}

/// Process-wide permit pool shared by every caller.
pub struct RateLimiterPolicy {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    config: RateLimiterConfig,
}

impl RateLimiterPolicy {
    /// Creates a new rate limiter.
    ///
    /// Permits replenish one at a time, evenly spread over the window, with
    /// a burst of `permits_per_window`.
    pub fn new(config: RateLimiterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let burst = NonZeroU32::new(config.permits_per_window)
            .ok_or_else(|| ConfigError::invalid("rate_limiter.permits_per_window", "zero"))?;
        let quota = Quota::with_period(config.window / config.permits_per_window)
            .ok_or_else(|| ConfigError::invalid("rate_limiter.window", "too short for permits"))?
            .allow_burst(burst);

        Ok(Self {
            limiter: RateLimiter::direct(quota),
            config,
        })
    }

    /// Takes one permit, waiting at most `acquire_timeout`.
    pub async fn acquire(&self) -> Result<(), ResilienceError> {
        if self.limiter.check().is_ok() {
            return Ok(());
        }

        tokio::time::timeout(self.config.acquire_timeout, self.limiter.until_ready())
            .await
            .map_err(|_| {
                tracing::debug!(
                    acquire_timeout = ?self.config.acquire_timeout,
                    "Rate limiter permit unavailable"
                );
                ResilienceError::RateLimited {
                    acquire_timeout: self.config.acquire_timeout,
                }
            })
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}
