//! Domain models for the conversion service.

pub mod conversion;
pub mod provider;

pub use conversion::{ConversionResult, Provenance};
pub use provider::ProviderStatus;
