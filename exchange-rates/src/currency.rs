//! Currency codes and ordered currency pairs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ExchangeRateError;

/// An ISO-4217 style currency code, normalized to uppercase.
///
/// Only the shape is validated (three ASCII letters); whether a code is known
/// to any rate source is decided by that source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Result<Self, ExchangeRateError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ExchangeRateError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ExchangeRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ExchangeRateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// An ordered `(from, to)` pair.
///
/// Equality is directional: `USD:EUR` and `EUR:USD` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { from, to }
    }

    /// Parses both codes, normalizing case.
    pub fn parse(from: &str, to: &str) -> Result<Self, ExchangeRateError> {
        Ok(Self::new(from.parse()?, to.parse()?))
    }

    /// True when both sides are the same currency.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.to.clone(), self.from.clone())
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap().as_str(), "USD");
        assert_eq!(" eur ".parse::<CurrencyCode>().unwrap().as_str(), "EUR");
    }

    #[test]
    fn test_currency_code_rejects_bad_shape() {
        assert!("US".parse::<CurrencyCode>().is_err());
        assert!("USDX".parse::<CurrencyCode>().is_err());
        assert!("U5D".parse::<CurrencyCode>().is_err());
        assert!("".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_pair_is_directional() {
        let pair = CurrencyPair::parse("USD", "EUR").unwrap();
        assert_ne!(pair, pair.reversed());
        assert_eq!(pair, pair.reversed().reversed());
        assert_eq!(pair.to_string(), "USD:EUR");
    }

    #[test]
    fn test_identity_pair() {
        assert!(CurrencyPair::parse("inr", "INR").unwrap().is_identity());
        assert!(!CurrencyPair::parse("INR", "USD").unwrap().is_identity());
    }

    #[test]
    fn test_currency_code_serde() {
        let code: CurrencyCode = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(code.as_str(), "GBP");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"GBP\"");
        assert!(serde_json::from_str::<CurrencyCode>("\"pounds\"").is_err());
    }
}
