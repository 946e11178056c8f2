//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod provider;
mod remote;

pub use provider::RateProvider;
pub use remote::RemoteRateSource;
