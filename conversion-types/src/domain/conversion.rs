//! Conversion result and rate provenance.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use exchange_rates::{CurrencyCode, CurrencyPair, Quantity, Rate};

/// Which layer produced the rate of a conversion.
///
/// Serialized as `identity`, `remote`, `fallback:<PROVIDER>` or
/// `fallback:ultimate`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provenance {
    /// `from == to`, answered without any lookup.
    Identity,
    /// Live rate from the remote rate service.
    Remote,
    /// Rate from a named fallback provider.
    Fallback(String),
    /// Every provider was exhausted; the 1:1 last resort.
    Ultimate,
}

impl Provenance {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Provenance::Fallback(_) | Provenance::Ultimate)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Identity => f.write_str("identity"),
            Provenance::Remote => f.write_str("remote"),
            Provenance::Fallback(provider) => write!(f, "fallback:{}", provider),
            Provenance::Ultimate => f.write_str("fallback:ultimate"),
        }
    }
}

impl FromStr for Provenance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(Provenance::Identity),
            "remote" => Ok(Provenance::Remote),
            "fallback:ultimate" => Ok(Provenance::Ultimate),
            other => match other.strip_prefix("fallback:") {
                Some(provider) if !provider.is_empty() => {
                    Ok(Provenance::Fallback(provider.to_string()))
                }
                _ => Err(format!("Unknown provenance: {}", s)),
            },
        }
    }
}

impl TryFrom<String> for Provenance {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Provenance> for String {
    fn from(provenance: Provenance) -> Self {
        provenance.to_string()
    }
}

/// Outcome of one conversion request. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub quantity: Quantity,
    pub rate: Rate,
    /// Always `rate * quantity`.
    pub total_amount: Decimal,
    pub provenance: Provenance,
    /// Service instance that answered (name, host, port).
    pub environment: String,
    pub resolved_at: DateTime<Utc>,
}

impl ConversionResult {
    pub fn new(
        pair: CurrencyPair,
        quantity: Quantity,
        rate: Rate,
        provenance: Provenance,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            from_currency: pair.from,
            to_currency: pair.to,
            quantity,
            rate,
            total_amount: rate.apply(quantity),
            provenance,
            environment: environment.into(),
            resolved_at: Utc::now(),
        }
    }

    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from_currency.clone(), self.to_currency.clone())
    }
}
