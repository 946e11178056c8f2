//! Fallback rate provider port.
//!
//! Providers are consulted in ascending `priority` order when the remote call
//! cannot be completed.

use exchange_rates::{CurrencyPair, Rate};

use crate::error::ProviderError;

/// A local source of rates used by the fallback chain.
pub trait RateProvider: Send + Sync {
    /// Stable name used in logs, provenance tags and health output.
    fn name(&self) -> &str;

    /// Lower numbers are tried first.
    fn priority(&self) -> u32;

    /// Whether the provider can currently be consulted.
    fn is_available(&self) -> bool {
        true
    }

    /// `Ok(None)` means the provider has no rate for this pair.
    fn get_rate(&self, pair: &CurrencyPair) -> Result<Option<Rate>, ProviderError>;
}
