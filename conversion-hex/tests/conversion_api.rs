//! HTTP-level tests for the conversion API.
//!
//! These drive the full router (handlers, service, resilience stack and
//! fallback chain) with an in-process remote rate source.

use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use conversion_hex::{
    PolicyConfiguration, RateResolutionService, ResolutionSettings, inbound::HttpServer,
    resilience::{RateLimiterConfig, RetryConfig},
};
use conversion_types::{CurrencyPair, Rate, RemoteError, RemoteRateSource};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use tower::ServiceExt;

/// Remote that always gives the same answer.
struct FixedRemote(Result<Rate, RemoteError>);

#[async_trait]
impl RemoteRateSource for FixedRemote {
    async fn fetch_rate(&self, _pair: &CurrencyPair) -> Result<Rate, RemoteError> {
        self.0.clone()
    }
}

/// Helper to build a router over the given remote.
fn create_test_app(remote: FixedRemote) -> axum::Router {
    let policies = PolicyConfiguration {
        rate_limiter: RateLimiterConfig {
            permits_per_window: 1_000,
            window: Duration::from_secs(1),
            acquire_timeout: Duration::from_millis(1),
        },
        retry: RetryConfig {
            max_attempts: 2,
            wait: Duration::from_millis(1),
            ..Default::default()
        },
        ..Default::default()
    };
    let settings = ResolutionSettings {
        environment: "currency-conversion-service [hostname: test, port: 8282]".into(),
        ..Default::default()
    };
    let service = RateResolutionService::standard(remote, policies, settings).unwrap();
    HttpServer::new(service).router()
}

fn healthy_remote() -> FixedRemote {
    FixedRemote(Ok(Rate::new(dec!(83.12)).unwrap()))
}

fn failing_remote() -> FixedRemote {
    FixedRemote(Err(RemoteError::Transport("connection refused".into())))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app(healthy_remote());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_convert_with_remote_rate() {
    let app = create_test_app(healthy_remote());

    let response = app
        .oneshot(get("/currencyconversion/usd/to/inr/100/calculate"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["fromCurrency"], "USD");
    assert_eq!(json["toCurrency"], "INR");
    assert_eq!(json["quantity"], "100");
    assert_eq!(json["rate"], "83.12");
    assert_eq!(json["totalAmount"], "8312.00");
    assert_eq!(json["provenance"], "remote");
    assert_eq!(
        json["environment"],
        "currency-conversion-service [hostname: test, port: 8282]"
    );
}

#[tokio::test]
async fn test_convert_falls_back_to_static_table() {
    let app = create_test_app(failing_remote());

    let response = app
        .oneshot(get("/currencyconversion/USD/to/INR/100/calculate"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["rate"], "83.50");
    assert_eq!(json["totalAmount"], "8350.00");
    assert_eq!(json["provenance"], "fallback:STATIC");
}

#[tokio::test]
async fn test_convert_unknown_pair_never_errors() {
    let app = create_test_app(failing_remote());

    let response = app
        .oneshot(get("/currencyconversion/SEK/to/NOK/12.5/calculate"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["rate"], "1");
    assert_eq!(json["totalAmount"], "12.5");
    assert_eq!(json["provenance"], "fallback:DEFAULT");
}

#[tokio::test]
async fn test_identity_conversion() {
    let app = create_test_app(failing_remote());

    let response = app
        .oneshot(get("/currencyconversion/EUR/to/EUR/10/calculate"))
        .await
        .unwrap();

    let json = json_body(response).await;
    assert_eq!(json["provenance"], "identity");
    assert_eq!(json["totalAmount"], "10");
}

#[tokio::test]
async fn test_invalid_input_returns_400() {
    let app = create_test_app(healthy_remote());

    for uri in [
        "/currencyconversion/US/to/INR/100/calculate",
        "/currencyconversion/USD/to/1NR/100/calculate",
        "/currencyconversion/USD/to/INR/abc/calculate",
        "/currencyconversion/USD/to/INR/-5/calculate",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{} should be rejected",
            uri
        );

        let json = json_body(response).await;
        assert_eq!(json["code"], 400);
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_provider_statuses() {
    let app = create_test_app(healthy_remote());

    let response = app.oneshot(get("/health/providers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let providers = json.as_array().unwrap();
    assert_eq!(providers.len(), 3);
    assert_eq!(providers[0]["name"], "CACHED");
    assert_eq!(providers[0]["priority"], 1);
    assert_eq!(providers[0]["available"], true);
    assert_eq!(providers[2]["name"], "DEFAULT");
}
