//! Priority-ordered fallback chain.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use conversion_types::{
    CurrencyPair, Provenance, ProviderStatus, Rate, RateProvider, StaticRateTable,
};

use super::{CachedRateProvider, DefaultRateProvider, RateCache, StaticRateProvider};

/// Rate chosen by the fallback chain and who supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRate {
    pub rate: Rate,
    /// `None` when every provider was exhausted.
    pub provider: Option<String>,
}

impl FallbackRate {
    pub fn provenance(&self) -> Provenance {
        match &self.provider {
            Some(name) => Provenance::Fallback(name.clone()),
            None => Provenance::Ultimate,
        }
    }
}

pub struct FallbackOrchestrator {
    providers: Vec<Box<dyn RateProvider>>,
}

impl FallbackOrchestrator {
    /// Builds a chain ordered by ascending priority. Ties keep input order.
    pub fn new(mut providers: Vec<Box<dyn RateProvider>>) -> Self {
        providers.sort_by_key(|provider| provider.priority());

        let described = providers
            .iter()
            .map(|p| format!("{}(priority:{})", p.name(), p.priority()))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            count = providers.len(),
            providers = %described,
            "Initialized fallback orchestration"
        );

        Self { providers }
    }

    /// The standard chain: cache, then static table, then 1:1.
    pub fn standard(cache: Arc<RateCache>, table: StaticRateTable) -> Self {
        Self::new(vec![
            Box::new(CachedRateProvider::new(cache)),
            Box::new(StaticRateProvider::new(table)),
            Box::new(DefaultRateProvider),
        ])
    }

    /// Asks each available provider in turn; the first positive rate wins.
    ///
    /// Provider errors are logged and skipped. Never fails: an exhausted
    /// chain yields 1.
    pub fn resolve(&self, pair: &CurrencyPair) -> FallbackRate {
        debug!(pair = %pair, providers = self.providers.len(), "Resolving fallback rate");

        for provider in &self.providers {
            if !provider.is_available() {
                debug!(provider = provider.name(), "Provider unavailable, skipping");
                continue;
            }

            match provider.get_rate(pair) {
                Ok(Some(rate)) => {
                    debug!(provider = provider.name(), rate = %rate, "Fallback rate found");
                    return FallbackRate {
                        rate,
                        provider: Some(provider.name().to_string()),
                    };
                }
                Ok(None) => {
                    debug!(provider = provider.name(), pair = %pair, "Provider has no rate");
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Provider failed");
                }
            }
        }

        error!(pair = %pair, "All fallback providers failed, using 1:1 rate");
        FallbackRate {
            rate: Rate::ONE,
            provider: None,
        }
    }

    /// One status per provider, in chain order.
    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .map(|provider| ProviderStatus {
                name: provider.name().to_string(),
                priority: provider.priority(),
                available: provider.is_available(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
