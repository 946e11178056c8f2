//! Data Transfer Objects (DTOs) shared with the remote rate service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use exchange_rates::{CurrencyCode, CurrencyPair, Rate};

use crate::error::RemoteError;

/// Body of `GET /currencyexchange/{from}/to/{to}/rate`.
///
/// The rate is kept as a raw decimal so a zero or negative value from the
/// remote side is reported as a payload error rather than a decode failure.
/// Other fields the remote sends (its `environment` tag, ids) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRateResponse {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub rate: Decimal,
}

impl RemoteRateResponse {
    /// Validates the payload against the requested pair and returns the rate.
    pub fn into_rate(self, requested: &CurrencyPair) -> Result<Rate, RemoteError> {
        if self.from_currency != requested.from || self.to_currency != requested.to {
            return Err(RemoteError::InvalidPayload(format!(
                "asked for {} but received {}:{}",
                requested, self.from_currency, self.to_currency
            )));
        }

        Rate::new(self.rate).map_err(|e| RemoteError::InvalidPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pair() -> CurrencyPair {
        CurrencyPair::parse("USD", "INR").unwrap()
    }

    #[test]
    fn test_parses_remote_payload() {
        let body = r#"{"fromCurrency":"USD","toCurrency":"INR","rate":83.12}"#;
        let response: RemoteRateResponse = serde_json::from_str(body).unwrap();

        let rate = response.into_rate(&pair()).unwrap();
        assert_eq!(rate.value(), dec!(83.12));
    }

    #[test]
    fn test_remote_only_fields_are_ignored() {
        let body = r#"{"id":10001,"fromCurrency":"USD","toCurrency":"INR","rate":83.12,"environment":"currency-exchange-service [hostname: a, port: 8181]"}"#;
        let response: RemoteRateResponse = serde_json::from_str(body).unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("environment").is_none());
        assert_eq!(response.into_rate(&pair()).unwrap().value(), dec!(83.12));
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let body = r#"{"fromCurrency":"USD","toCurrency":"INR","rate":0}"#;
        let response: RemoteRateResponse = serde_json::from_str(body).unwrap();

        assert!(matches!(
            response.into_rate(&pair()),
            Err(RemoteError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_rejects_mismatched_pair() {
        let body = r#"{"fromCurrency":"INR","toCurrency":"USD","rate":0.012}"#;
        let response: RemoteRateResponse = serde_json::from_str(body).unwrap();

        assert!(response.into_rate(&pair()).is_err());
    }
}
