//! Remote exchange rate source port.
//!
//! The one dependency the resilience stack protects. Implementations can be
//! HTTP clients, mock sources, etc.

use exchange_rates::{CurrencyPair, Rate};

use crate::error::RemoteError;

/// Port trait for the remote rate service.
#[async_trait::async_trait]
pub trait RemoteRateSource: Send + Sync + 'static {
    /// Fetches the current rate: how many units of `pair.to` one unit of
    /// `pair.from` buys. One call is one attempt; retries happen above.
    async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<Rate, RemoteError>;
}

#[async_trait::async_trait]
impl<T: RemoteRateSource + ?Sized> RemoteRateSource for std::sync::Arc<T> {
    async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<Rate, RemoteError> {
        (**self).fetch_rate(pair).await
    }
}
