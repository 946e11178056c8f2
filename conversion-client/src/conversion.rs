//! SDK for the currency conversion API.

use reqwest::Client;
use serde::de::DeserializeOwned;

use conversion_types::{ConversionResult, CurrencyCode, ProviderStatus, Quantity};

use crate::{ClientError, error_message, normalize_base_url};

/// Currency conversion API client.
pub struct ConversionClient {
    base_url: String,
    http: Client,
}

impl ConversionClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Converts `quantity` from one currency to another.
    pub async fn convert(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        quantity: Quantity,
    ) -> Result<ConversionResult, ClientError> {
        self.get(&format!(
            "/currencyconversion/{}/to/{}/{}/calculate",
            from, to, quantity
        ))
        .await
    }

    /// Fallback provider statuses, in chain order.
    pub async fn provider_statuses(&self) -> Result<Vec<ProviderStatus>, ClientError> {
        self.get("/health/providers").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(body),
            })
        }
    }
}
