//! # Conversion Client SDK
//!
//! Typed Rust clients for the two HTTP APIs around currency conversion:
//!
//! - [`ExchangeClient`] - outbound adapter for the remote rate service,
//!   implementing the `RemoteRateSource` port
//! - [`ConversionClient`] - SDK for this service's own conversion API

mod conversion;
mod exchange;

pub use conversion::ConversionClient;
pub use exchange::{DEFAULT_EXCHANGE_TIMEOUT, ExchangeClient};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pulls the `error` field out of a JSON error body, or returns the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(body)
}

fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
