//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use conversion_hex::PolicyConfiguration;
use conversion_hex::resilience::{
    BulkheadConfig, CircuitBreakerConfig, RateLimiterConfig, RetryConfig,
};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub exchange_service_url: String,
    /// Timeout of one HTTP call to the exchange service.
    pub remote_http_timeout: Duration,
    /// Deadline of one whole conversion, retries included.
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
    pub policies: PolicyConfiguration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup. Unset keys take
    /// their defaults; set but unparsable keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = &lookup;

        let defaults = PolicyConfiguration::default();
        let policies = PolicyConfiguration {
            rate_limiter: RateLimiterConfig {
                permits_per_window: parse_or(
                    var,
                    "RATE_LIMITER_PERMITS_PER_WINDOW",
                    defaults.rate_limiter.permits_per_window,
                )?,
                window: millis_or(var, "RATE_LIMITER_WINDOW_MS", defaults.rate_limiter.window)?,
                acquire_timeout: millis_or(
                    var,
                    "RATE_LIMITER_ACQUIRE_TIMEOUT_MS",
                    defaults.rate_limiter.acquire_timeout,
                )?,
            },
            bulkhead: BulkheadConfig {
                max_concurrent_calls: parse_or(
                    var,
                    "BULKHEAD_MAX_CONCURRENT",
                    defaults.bulkhead.max_concurrent_calls,
                )?,
                max_wait: millis_or(var, "BULKHEAD_MAX_WAIT_MS", defaults.bulkhead.max_wait)?,
            },
            circuit_breaker: CircuitBreakerConfig {
                failure_rate_threshold: parse_or(
                    var,
                    "CIRCUIT_BREAKER_FAILURE_RATE_THRESHOLD",
                    defaults.circuit_breaker.failure_rate_threshold,
                )?,
                sliding_window_size: parse_or(
                    var,
                    "CIRCUIT_BREAKER_SLIDING_WINDOW_SIZE",
                    defaults.circuit_breaker.sliding_window_size,
                )?,
                minimum_calls: parse_or(
                    var,
                    "CIRCUIT_BREAKER_MINIMUM_CALLS",
                    defaults.circuit_breaker.minimum_calls,
                )?,
                open_duration: millis_or(
                    var,
                    "CIRCUIT_BREAKER_OPEN_DURATION_MS",
                    defaults.circuit_breaker.open_duration,
                )?,
                half_open_calls: parse_or(
                    var,
                    "CIRCUIT_BREAKER_HALF_OPEN_CALLS",
                    defaults.circuit_breaker.half_open_calls,
                )?,
            },
            retry: RetryConfig {
                max_attempts: parse_or(var, "RETRY_MAX_ATTEMPTS", defaults.retry.max_attempts)?,
                wait: millis_or(var, "RETRY_WAIT_MS", defaults.retry.wait)?,
                retry_on: defaults.retry.retry_on,
            },
        };

        let config = Self {
            port: parse_or(var, "PORT", 8282)?,
            exchange_service_url: var("CURRENCY_EXCHANGE_SERVICE_URL")
                .unwrap_or_else(|| "http://localhost:8181".to_string()),
            remote_http_timeout: millis_or(
                var,
                "REMOTE_HTTP_TIMEOUT_MS",
                Duration::from_secs(2),
            )?,
            request_timeout: millis_or(var, "REQUEST_TIMEOUT_MS", Duration::from_secs(10))?,
            cache_ttl: millis_or(var, "CACHE_TTL_MS", Duration::from_secs(2 * 60 * 60))?,
            cache_sweep_interval: millis_or(
                var,
                "CACHE_SWEEP_INTERVAL_MS",
                Duration::from_secs(60),
            )?,
            policies,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.policies.validate()?;
        for (name, value) in [
            ("REMOTE_HTTP_TIMEOUT_MS", self.remote_http_timeout),
            ("REQUEST_TIMEOUT_MS", self.request_timeout),
            ("CACHE_SWEEP_INTERVAL_MS", self.cache_sweep_interval),
        ] {
            anyhow::ensure!(!value.is_zero(), "{} must be greater than zero", name);
        }
        Ok(())
    }

    /// Instance tag reported in every conversion result.
    pub fn environment(&self, hostname: &str) -> String {
        format!(
            "currency-conversion-service [hostname: {}, port: {}]",
            hostname, self.port
        )
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn millis_or(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    match var(key) {
        Some(_) => parse_or(var, key, 0u64).map(Duration::from_millis),
        None => Ok(default),
    }
}
