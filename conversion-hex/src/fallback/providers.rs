//! The built-in fallback providers.

use std::sync::Arc;

use conversion_types::{CurrencyPair, ProviderError, Rate, RateProvider, StaticRateTable};

use super::RateCache;

/// Serves the last rate the remote returned, while it is fresh.
pub struct CachedRateProvider {
    cache: Arc<RateCache>,
}

impl CachedRateProvider {
    pub const NAME: &'static str = "CACHED";
    pub const PRIORITY: u32 = 1;

    pub fn new(cache: Arc<RateCache>) -> Self {
        Self { cache }
    }
}

impl RateProvider for CachedRateProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        Self::PRIORITY
    }

    fn get_rate(&self, pair: &CurrencyPair) -> Result<Option<Rate>, ProviderError> {
        Ok(self.cache.get(pair))
    }
}

/// Serves the built-in static table, deriving reverse pairs.
pub struct StaticRateProvider {
    table: StaticRateTable,
}

impl StaticRateProvider {
    pub const NAME: &'static str = "STATIC";
    pub const PRIORITY: u32 = 2;

    pub fn new(table: StaticRateTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &StaticRateTable {
        &self.table
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::new(StaticRateTable::standard())
    }
}

impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        Self::PRIORITY
    }

    fn get_rate(&self, pair: &CurrencyPair) -> Result<Option<Rate>, ProviderError> {
        Ok(self.table.lookup(pair))
    }
}

/// Answers 1:1 for every pair. Always last.
#[derive(Debug, Default)]
pub struct DefaultRateProvider;

impl DefaultRateProvider {
    pub const NAME: &'static str = "DEFAULT";
    pub const PRIORITY: u32 = 3;
}

impl RateProvider for DefaultRateProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        Self::PRIORITY
    }

    fn get_rate(&self, _pair: &CurrencyPair) -> Result<Option<Rate>, ProviderError> {
        Ok(Some(Rate::ONE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pair(from: &str, to: &str) -> CurrencyPair {
        CurrencyPair::parse(from, to).unwrap()
    }

    #[test]
    fn test_cached_provider_reads_cache() {
        let cache = Arc::new(RateCache::new());
        let provider = CachedRateProvider::new(cache.clone());
        assert_eq!(provider.get_rate(&pair("USD", "INR")).unwrap(), None);

        cache.put_default(pair("USD", "INR"), Rate::new(dec!(83.12)).unwrap());
        assert_eq!(
            provider.get_rate(&pair("USD", "INR")).unwrap(),
            Some(Rate::new(dec!(83.12)).unwrap())
        );
    }

    #[test]
    fn test_static_provider() {
        let provider = StaticRateProvider::default();
        assert_eq!(
            provider.get_rate(&pair("USD", "INR")).unwrap().unwrap().value(),
            dec!(83.50)
        );
        assert_eq!(provider.get_rate(&pair("SEK", "NOK")).unwrap(), None);
    }

    #[test]
    fn test_default_provider_is_identity() {
        let provider = DefaultRateProvider;
        assert_eq!(provider.get_rate(&pair("SEK", "NOK")).unwrap(), Some(Rate::ONE));
        assert!(provider.is_available());
    }

    #[test]
    fn test_priorities_are_ordered() {
        assert!(CachedRateProvider::PRIORITY < StaticRateProvider::PRIORITY);
        assert!(StaticRateProvider::PRIORITY < DefaultRateProvider::PRIORITY);
    }
}
