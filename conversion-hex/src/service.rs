//! Rate Resolution Service
//!
//! Resolves a conversion rate through the resilience stack, falling back to
//! local providers when the remote cannot answer. Contains NO transport
//! logic; the remote rate source is injected through the port.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use conversion_types::{
    ConfigError, ConversionResult, CurrencyPair, Provenance, ProviderStatus, Quantity, Rate,
    RemoteRateSource, ResilienceError, StaticRateTable,
};

use crate::fallback::{DEFAULT_CACHE_TTL, FallbackOrchestrator, RateCache};
use crate::resilience::{PolicyConfiguration, ResilienceStack};

/// Environment tag used when none is configured.
pub const DEFAULT_ENVIRONMENT: &str = "currency-conversion-service";

/// Per-request knobs of the service.
#[derive(Debug, Clone)]
pub struct ResolutionSettings {
    /// TTL of rates written to the cache after a successful remote fetch.
    pub cache_ttl: Duration,
    /// Deadline for the whole protected call, retries and queueing included.
    pub request_timeout: Duration,
    /// Identifies this instance in every result.
    pub environment: String,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            request_timeout: Duration::from_secs(10),
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

/// Application service for currency conversion.
///
/// Generic over `S: RemoteRateSource` - the remote adapter is injected at
/// compile time, so tests drive it with in-process fakes.
pub struct RateResolutionService<S: RemoteRateSource> {
    remote: S,
    stack: ResilienceStack,
    cache: Arc<RateCache>,
    fallback: FallbackOrchestrator,
    settings: ResolutionSettings,
}

impl<S: RemoteRateSource> RateResolutionService<S> {
    pub fn new(
        remote: S,
        stack: ResilienceStack,
        cache: Arc<RateCache>,
        fallback: FallbackOrchestrator,
        settings: ResolutionSettings,
    ) -> Self {
        Self {
            remote,
            stack,
            cache,
            fallback,
            settings,
        }
    }

    /// Wires the standard fallback chain over a fresh cache.
    pub fn standard(
        remote: S,
        policies: PolicyConfiguration,
        settings: ResolutionSettings,
    ) -> Result<Self, ConfigError> {
        let stack = ResilienceStack::new(policies)?;
        let cache = Arc::new(RateCache::new());
        let fallback = FallbackOrchestrator::standard(cache.clone(), StaticRateTable::standard());
        Ok(Self::new(remote, stack, cache, fallback, settings))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts `quantity` along `pair`.
    ///
    /// Total: every failure of the protected remote call routes to the
    /// fallback chain, which always yields a rate.
    #[tracing::instrument(skip(self), fields(pair = %pair, quantity = %quantity))]
    pub async fn convert(&self, pair: CurrencyPair, quantity: Quantity) -> ConversionResult {
        // Identity pairs bypass the stack: no limiter permit, no bulkhead
        // slot, no breaker sample.
        if pair.is_identity() {
            return self.result(pair, quantity, Rate::ONE, Provenance::Identity);
        }

        match self.fetch_protected(&pair).await {
            Ok(rate) => {
                self.cache.put(pair.clone(), rate, self.settings.cache_ttl);
                info!(rate = %rate, "Resolved rate from remote");
                self.result(pair, quantity, rate, Provenance::Remote)
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "Remote rate unavailable, using fallback");
                let fallback = self.fallback.resolve(&pair);
                info!(
                    rate = %fallback.rate,
                    provenance = %fallback.provenance(),
                    "Resolved rate from fallback"
                );
                let provenance = fallback.provenance();
                self.result(pair, quantity, fallback.rate, provenance)
            }
        }
    }

    /// The remote call under the resilience stack and the caller deadline.
    async fn fetch_protected(&self, pair: &CurrencyPair) -> Result<Rate, ResilienceError> {
        let remote = &self.remote;
        let call = self.stack.protected_call(move || remote.fetch_rate(pair));

        tokio::time::timeout(self.settings.request_timeout, call)
            .await
            .unwrap_or(Err(ResilienceError::TimedOut(self.settings.request_timeout)))
    }

    fn result(
        &self,
        pair: CurrencyPair,
        quantity: Quantity,
        rate: Rate,
        provenance: Provenance,
    ) -> ConversionResult {
        ConversionResult::new(pair, quantity, rate, provenance, &self.settings.environment)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        self.fallback.provider_statuses()
    }

    pub fn stack(&self) -> &ResilienceStack {
        &self.stack
    }

    pub fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }

    pub fn settings(&self) -> &ResolutionSettings {
        &self.settings
    }
}
