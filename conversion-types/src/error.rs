//! Error types for the conversion service.

use std::time::Duration;

/// Failures of the remote rate call itself (one attempt).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Remote returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Rate not found for {0}")]
    NotFound(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl RemoteError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Transport(_) | RemoteError::Timeout(_) => true,
            RemoteError::Status { status, .. } => *status >= 500 || *status == 429,
            RemoteError::NotFound(_) | RemoteError::InvalidPayload(_) => false,
        }
    }
}

/// Failures surfaced by the resilience policy stack.
///
/// None of these reach the caller of a conversion; they all route to the
/// fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResilienceError {
    #[error("Rate limiter rejected the call: no permit within {acquire_timeout:?}")]
    RateLimited { acquire_timeout: Duration },

    #[error("Bulkhead full: no slot within {max_wait:?}")]
    BulkheadFull { max_wait: Duration },

    #[error("Circuit breaker is open")]
    CircuitOpen,

    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: RemoteError,
    },

    #[error("Remote call failed: {0}")]
    RemoteCallFailed(#[source] RemoteError),

    #[error("Conversion deadline of {0:?} elapsed")]
    TimedOut(Duration),
}

impl ResilienceError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ResilienceError::RateLimited { .. } => "RATE_LIMITED",
            ResilienceError::BulkheadFull { .. } => "BULKHEAD_FULL",
            ResilienceError::CircuitOpen => "CIRCUIT_OPEN",
            ResilienceError::RetryExhausted { .. } => "RETRY_EXHAUSTED",
            ResilienceError::RemoteCallFailed(_) => "REMOTE_CALL_FAILED",
            ResilienceError::TimedOut(_) => "TIMED_OUT",
        }
    }
}

/// A single fallback provider failed; logged and skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider {provider} lookup failed: {reason}")]
    LookupFailed { provider: String, reason: String },
}

/// Invalid policy or service configuration, detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<exchange_rates::ExchangeRateError> for AppError {
    fn from(err: exchange_rates::ExchangeRateError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(RemoteError::Transport("connection refused".into()).is_retryable());
        assert!(RemoteError::Timeout(Duration::from_secs(2)).is_retryable());
        assert!(
            RemoteError::Status {
                status: 503,
                message: "unavailable".into()
            }
            .is_retryable()
        );
        assert!(
            !RemoteError::Status {
                status: 400,
                message: "bad".into()
            }
            .is_retryable()
        );
        assert!(!RemoteError::NotFound("USD:XYZ".into()).is_retryable());
        assert!(!RemoteError::InvalidPayload("rate 0".into()).is_retryable());
    }

    #[test]
    fn test_currency_errors_are_bad_requests() {
        let err: AppError = exchange_rates::ExchangeRateError::InvalidCurrency("US".into()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
