//! Immutable static rate table with reverse-pair derivation.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{CurrencyPair, Rate};

/// Declares static rates as `FROM => TO: rate` lines.
///
/// Expands to a `&[(&str, &str, Decimal)]` slice evaluated at compile time.
macro_rules! static_rates {
    (
        $(
            $from:ident => $to:ident : $rate:tt
        ),* $(,)?
    ) => {
        &[
            $(
                (stringify!($from), stringify!($to), ::rust_decimal_macros::dec!($rate))
            ),*
        ]
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// STANDARD RATES - Add new pairs here!
// ─────────────────────────────────────────────────────────────────────────────

const STANDARD_RATES: &[(&str, &str, Decimal)] = static_rates! {
    // USD as base
    USD => EUR: 0.85,
    USD => GBP: 0.75,
    USD => JPY: 110.50,
    USD => CAD: 1.25,
    USD => AUD: 1.35,
    USD => CHF: 0.92,
    USD => CNY: 7.20,
    USD => INR: 83.50,
    USD => BRL: 5.20,
    USD => MXN: 18.50,

    // EUR as base
    EUR => USD: 1.18,
    EUR => GBP: 0.88,
    EUR => JPY: 130.00,
    EUR => INR: 98.24,

    // GBP as base
    GBP => USD: 1.33,
    GBP => EUR: 1.14,
    GBP => INR: 111.33,

    // INR as base
    INR => USD: 0.012,
    INR => EUR: 0.010,
    INR => GBP: 0.009,
};

/// Deterministic table of well-known rates, built once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct StaticRateTable {
    rates: HashMap<CurrencyPair, Rate>,
}

impl StaticRateTable {
    /// The built-in table of major currency pairs.
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_RATES.iter().filter_map(|(from, to, rate)| {
            Some((CurrencyPair::parse(from, to).ok()?, Rate::new(*rate).ok()?))
        }))
    }

    /// Builds a table from explicit entries. Later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = (CurrencyPair, Rate)>) -> Self {
        Self {
            rates: entries.into_iter().collect(),
        }
    }

    /// Looks up a rate.
    ///
    /// Identity pairs resolve to exactly 1 without consulting the table. A
    /// missing direct pair falls back to `1 / reverse`, rounded to six places.
    pub fn lookup(&self, pair: &CurrencyPair) -> Option<Rate> {
        if pair.is_identity() {
            return Some(Rate::ONE);
        }

        if let Some(rate) = self.rates.get(pair) {
            return Some(*rate);
        }

        self.rates.get(&pair.reversed()).and_then(Rate::inverse)
    }

    /// True when the pair or its reverse has an entry.
    pub fn supports(&self, pair: &CurrencyPair) -> bool {
        self.rates.contains_key(pair) || self.rates.contains_key(&pair.reversed())
    }

    /// All direct entries, sorted by pair for stable output.
    pub fn supported_pairs(&self) -> Vec<(CurrencyPair, Rate)> {
        let mut pairs: Vec<_> = self.rates.iter().map(|(p, r)| (p.clone(), *r)).collect();
        pairs.sort_by(|a, b| (&a.0.from, &a.0.to).cmp(&(&b.0.from, &b.0.to)));
        pairs
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
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
    fn test_standard_table_loads_every_entry() {
        let table = StaticRateTable::standard();
        assert_eq!(table.len(), STANDARD_RATES.len());
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn test_direct_lookup() {
        let table = StaticRateTable::standard();
        assert_eq!(table.lookup(&pair("USD", "INR")).unwrap().value(), dec!(83.50));
        assert_eq!(table.lookup(&pair("gbp", "eur")).unwrap().value(), dec!(1.14));
    }

    #[test]
    fn test_reverse_derivation() {
        let table = StaticRateTable::from_entries([(
            pair("EUR", "USD"),
            Rate::new(dec!(1.18)).unwrap(),
        )]);

        let derived = table.lookup(&pair("USD", "EUR")).unwrap();
        assert_eq!(derived.value(), dec!(0.847458));
    }

    #[test]
    fn test_direct_entry_wins_over_reverse() {
        // Both USD:EUR and EUR:USD exist in the standard table
        let table = StaticRateTable::standard();
        assert_eq!(table.lookup(&pair("USD", "EUR")).unwrap().value(), dec!(0.85));
    }

    #[test]
    fn test_reverse_from_standard_table() {
        let table = StaticRateTable::standard();
        // Only USD:JPY is present
        assert_eq!(table.lookup(&pair("JPY", "USD")).unwrap().value(), dec!(0.009050));
        assert!(table.supports(&pair("JPY", "USD")));
    }

    #[test]
    fn test_identity_skips_table() {
        let table = StaticRateTable::default();
        assert!(table.is_empty());
        assert_eq!(table.lookup(&pair("XYZ", "XYZ")), Some(Rate::ONE));
    }

    #[test]
    fn test_unknown_pair() {
        let table = StaticRateTable::standard();
        assert_eq!(table.lookup(&pair("SEK", "NOK")), None);
        assert!(!table.supports(&pair("SEK", "NOK")));
    }

    #[test]
    fn test_supported_pairs_sorted() {
        let table = StaticRateTable::standard();
        let pairs = table.supported_pairs();
        assert_eq!(pairs.len(), 20);
        assert_eq!(pairs[0].0, pair("EUR", "GBP"));
    }
}
