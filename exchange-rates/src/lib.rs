//! Exchange Rate Value Types and Static Rate Table
//!
//! This library provides the leaf value types every other crate in the
//! workspace builds on, plus a deterministic table of well-known rates that
//! never needs the network.
//!
//! - [`CurrencyCode`] / [`CurrencyPair`] - normalized ISO codes, ordered pairs
//! - [`Rate`] - strictly positive decimal exchange rate
//! - [`Quantity`] - bounded, non-negative decimal amount
//! - [`StaticRateTable`] - immutable table with reverse-pair derivation
//!
//! # Adding a Static Rate
//! Add a line to the `static_rates!` invocation in `table.rs`:
//! ```ignore
//! static_rates! {
//!     // ... existing pairs ...
//!     USD => SEK: 10.45,
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::{CurrencyPair, Quantity, StaticRateTable};
//!
//! let table = StaticRateTable::standard();
//! let pair = CurrencyPair::parse("usd", "inr").unwrap();
//!
//! let rate = table.lookup(&pair).unwrap();
//! let total = rate.apply(Quantity::new(100.into()).unwrap());
//! assert_eq!(total.to_string(), "8350.00");
//! ```

mod currency;
mod rate;
mod table;

pub use currency::{CurrencyCode, CurrencyPair};
pub use rate::{Quantity, Rate};
pub use table::StaticRateTable;

pub use rust_decimal::Decimal;

/// Errors raised while constructing exchange-rate value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeRateError {
    #[error("Invalid currency code: {0:?} (expected three ASCII letters)")]
    InvalidCurrency(String),

    #[error("Rate must be strictly positive, got {0}")]
    NonPositiveRate(Decimal),

    #[error("Rate {0} exceeds the supported maximum")]
    RateOutOfRange(Decimal),

    #[error("Quantity must be between 0 and {max}, got {value}")]
    QuantityOutOfRange { value: Decimal, max: Decimal },

    #[error("Invalid decimal value: {0:?}")]
    InvalidDecimal(String),
}
