//! # Conversion Hex
//!
//! Application service layer and HTTP adapter for the currency conversion
//! service.
//!
//! ## Architecture
//!
//! - `resilience/` - Policy stack around the remote rate call
//! - `fallback/` - Rate cache and the priority-ordered provider chain
//! - `service/` - Application service (resolves rates, computes totals)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `S: RemoteRateSource`, allowing different
//! remote adapters to be injected.

pub mod fallback;
pub mod inbound;
pub mod resilience;
pub mod service;


pub use fallback::{FallbackOrchestrator, RateCache};
pub use resilience::{PolicyConfiguration, ResilienceStack};
pub use service::{RateResolutionService, ResolutionSettings};
