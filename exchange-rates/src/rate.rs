//! Decimal exchange rates and quantities.
//!
//! Both types wrap `rust_decimal::Decimal`; floating point never enters a
//! conversion. Their bounds make `rate * quantity` infallible.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::ExchangeRateError;

/// Fractional digits kept when a rate is derived by inversion.
pub const DERIVED_RATE_SCALE: u32 = 6;

// ─────────────────────────────────────────────────────────────────────────────
// Rate
// ─────────────────────────────────────────────────────────────────────────────

/// A strictly positive exchange rate: units of `to` per one unit of `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    /// The identity rate, exactly 1.
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// Largest rate accepted from any source.
    pub const MAX: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

    pub fn new(value: Decimal) -> Result<Self, ExchangeRateError> {
        if value <= Decimal::ZERO {
            return Err(ExchangeRateError::NonPositiveRate(value));
        }
        if value > Self::MAX {
            return Err(ExchangeRateError::RateOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0 == Decimal::ONE
    }

    /// `1 / rate`, rounded half-up to six fractional digits.
    ///
    /// Returns `None` when the rounded result is zero (rate too large to
    /// invert at this scale).
    pub fn inverse(&self) -> Option<Rate> {
        let inverted = Decimal::ONE
            .checked_div(self.0)?
            .round_dp_with_strategy(DERIVED_RATE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        Rate::new(inverted).ok()
    }

    /// Converts a quantity at this rate. Exact within decimal precision.
    pub fn apply(&self, quantity: Quantity) -> Decimal {
        self.0 * quantity.value()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = ExchangeRateError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl FromStr for Rate {
    type Err = ExchangeRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| ExchangeRateError::InvalidDecimal(s.to_string()))?;
        Self::new(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quantity
// ─────────────────────────────────────────────────────────────────────────────

/// A non-negative amount of the source currency to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    /// Largest quantity accepted (10^15).
    pub const MAX: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

    pub fn new(value: Decimal) -> Result<Self, ExchangeRateError> {
        if value < Decimal::ZERO || value > Self::MAX {
            return Err(ExchangeRateError::QuantityOutOfRange {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = ExchangeRateError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl FromStr for Quantity {
    type Err = ExchangeRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| ExchangeRateError::InvalidDecimal(s.to_string()))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_must_be_positive() {
        assert!(Rate::new(dec!(0)).is_err());
        assert!(Rate::new(dec!(-1.5)).is_err());
        assert!(Rate::new(dec!(0.000001)).is_ok());
    }

    #[test]
    fn test_rate_upper_bound() {
        assert!(Rate::new(Rate::MAX).is_ok());
        assert_eq!(
            Rate::new(Rate::MAX + dec!(1)),
            Err(ExchangeRateError::RateOutOfRange(Rate::MAX + dec!(1)))
        );
    }

    #[test]
    fn test_inverse_rounds_half_up_to_six_places() {
        let rate = Rate::new(dec!(1.18)).unwrap();
        assert_eq!(rate.inverse().unwrap().value(), dec!(0.847458));

        let rate = Rate::new(dec!(110.50)).unwrap();
        assert_eq!(rate.inverse().unwrap().value(), dec!(0.009050));

        // 1 / 8 = 0.125 exactly, no rounding needed
        let rate = Rate::new(dec!(8)).unwrap();
        assert_eq!(rate.inverse().unwrap().value(), dec!(0.125));
    }

    #[test]
    fn test_inverse_of_huge_rate_is_none() {
        let rate = Rate::new(dec!(100000000)).unwrap();
        assert!(rate.inverse().is_none());
    }

    #[test]
    fn test_apply_is_exact() {
        let rate = Rate::new(dec!(83.50)).unwrap();
        let quantity = Quantity::new(dec!(12.34)).unwrap();
        assert_eq!(rate.apply(quantity), dec!(1030.3900));
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(Quantity::MAX, dec!(1000000000000000));
        assert!(Quantity::new(dec!(0)).is_ok());
        assert!(Quantity::new(dec!(-0.01)).is_err());
        assert!(Quantity::new(Quantity::MAX + dec!(1)).is_err());
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!("0.85".parse::<Rate>().unwrap().value(), dec!(0.85));
        assert!("abc".parse::<Rate>().is_err());
        assert!("-3".parse::<Quantity>().is_err());
        assert_eq!(" 100 ".parse::<Quantity>().unwrap().value(), dec!(100));
    }

    #[test]
    fn test_rate_serde_rejects_non_positive() {
        assert!(serde_json::from_str::<Rate>("\"0\"").is_err());
        assert_eq!(
            serde_json::from_str::<Rate>("1.18").unwrap().value(),
            dec!(1.18)
        );
    }
}
