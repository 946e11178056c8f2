//! Fallback chain consulted when the protected remote call fails.
//!
//! - `cache` - last-known-good rates with TTL
//! - `providers` - CACHED (1), STATIC (2), DEFAULT (3)
//! - `orchestrator` - priority ordering and first-hit resolution

mod cache;
mod orchestrator;
mod providers;

pub use cache::{CacheStats, DEFAULT_CACHE_TTL, RateCache};
pub use orchestrator::{FallbackOrchestrator, FallbackRate};
pub use providers::{CachedRateProvider, DefaultRateProvider, StaticRateProvider};
