//! Resilience policies around the remote rate call.
//!
//! Composition order, outermost first:
//! rate limiter → bulkhead → circuit breaker → retry → remote call.
//!
//! - `rate_limiter` - Governor token bucket with bounded acquire wait
//! - `bulkhead` - concurrency cap with bounded queueing
//! - `circuit_breaker` - count-based sliding window, CLOSED/OPEN/HALF_OPEN
//! - `retry` - fixed-delay re-invocation of failed remote calls
//! - `stack` - the fixed-order pipeline and its configuration

mod bulkhead;
mod circuit_breaker;
mod rate_limiter;
mod retry;
mod stack;

pub use bulkhead::{Bulkhead, BulkheadConfig};
pub use circuit_breaker::{
    CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState,
};
pub use rate_limiter::{RateLimiterConfig, RateLimiterPolicy};
pub use retry::{AttemptFailure, RetryConfig, RetryPolicy, retry_all};
pub use stack::{PolicyConfiguration, ResilienceStack};
