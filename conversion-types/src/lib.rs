//! # Conversion Types
//!
//! Domain types and port traits for the currency conversion service.
//! This crate has ZERO external IO dependencies - only data structures,
//! the error taxonomy, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Conversion results, provenance, provider status
//! - `ports/` - Traits the remote rate source and fallback providers implement
//! - `dto/` - Wire shapes shared with the remote rate service
//! - `error/` - Resilience, remote, provider and application errors

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{ConversionResult, Provenance, ProviderStatus};
pub use dto::RemoteRateResponse;
pub use error::{AppError, ConfigError, ProviderError, RemoteError, ResilienceError};
pub use exchange_rates::{
    CurrencyCode, CurrencyPair, Decimal, ExchangeRateError, Quantity, Rate, StaticRateTable,
};
pub use ports::{RateProvider, RemoteRateSource};
