//! Outbound adapter for the remote rate service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use conversion_types::{CurrencyPair, Rate, RemoteError, RemoteRateResponse, RemoteRateSource};

use crate::{ClientError, error_message, normalize_base_url};

/// Per-request HTTP timeout used when none is configured.
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for `GET /currencyexchange/{from}/to/{to}/rate`.
///
/// One call is one attempt; retrying and everything else protective is the
/// caller's business.
pub struct ExchangeClient {
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl ExchangeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: normalize_base_url(base_url),
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_transport(&self, err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Timeout(self.timeout)
        } else if err.is_decode() {
            RemoteError::InvalidPayload(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RemoteRateSource for ExchangeClient {
    async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<Rate, RemoteError> {
        let url = format!(
            "{}/currencyexchange/{}/to/{}/rate",
            self.base_url, pair.from, pair.to
        );
        tracing::debug!(%url, "Fetching remote rate");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(pair.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: error_message(body),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        let payload: RemoteRateResponse = serde_json::from_str(&body)
            .map_err(|e| RemoteError::InvalidPayload(e.to_string()))?;
        payload.into_rate(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pair() -> CurrencyPair {
        CurrencyPair::parse("USD", "INR").unwrap()
    }

    async fn mount(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/currencyexchange/USD/to/INR/rate"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> ExchangeClient {
        ExchangeClient::new(server.uri(), Duration::from_millis(200)).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_rate() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_string(
                r#"{"fromCurrency":"USD","toCurrency":"INR","rate":83.12,"environment":"currency-exchange-service [hostname: x, port: 8181]"}"#,
            ),
        )
        .await;

        let rate = client(&server).fetch_rate(&pair()).await.unwrap();
        assert_eq!(rate.value(), dec!(83.12));
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(404)).await;

        let err = client(&server).fetch_rate(&pair()).await.unwrap_err();
        assert_eq!(err, RemoteError::NotFound("USD:INR".into()));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(503).set_body_string(r#"{"error":"maintenance","code":503}"#),
        )
        .await;

        let err = client(&server).fetch_rate(&pair()).await.unwrap_err();
        assert_eq!(
            err,
            RemoteError::Status {
                status: 503,
                message: "maintenance".into()
            }
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_slow_remote_times_out() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200)
                .set_body_string(r#"{"fromCurrency":"USD","toCurrency":"INR","rate":83.12}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .await;

        let err = client(&server).fetch_rate(&pair()).await.unwrap_err();
        assert_eq!(err, RemoteError::Timeout(Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn test_invalid_payloads() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200)
                .set_body_string(r#"{"fromCurrency":"USD","toCurrency":"INR","rate":-1}"#),
        )
        .await;
        let err = client(&server).fetch_rate(&pair()).await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidPayload(_)));

        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_string("not json")).await;
        let err = client(&server).fetch_rate(&pair()).await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_unreachable_remote() {
        // Nothing listens on the discard port
        let client = ExchangeClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();

        let err = client.fetch_rate(&pair()).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ExchangeClient::new("http://localhost:8181/", DEFAULT_EXCHANGE_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8181");
    }
}
