//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use conversion_types::{AppError, CurrencyPair, Quantity, RemoteRateSource};

use crate::RateResolutionService;

/// Application state shared across handlers.
pub struct AppState<S: RemoteRateSource> {
    pub service: RateResolutionService<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Fallback provider statuses, in chain order.
#[tracing::instrument(skip(state))]
pub async fn provider_statuses<S: RemoteRateSource>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    tracing::debug!("Received provider status health check request");
    Json(state.service.provider_statuses())
}

/// Converts a quantity between two currencies.
///
/// Only malformed input fails; every upstream failure is absorbed by the
/// fallback chain.
#[tracing::instrument(skip(state))]
pub async fn convert<S: RemoteRateSource>(
    State(state): State<Arc<AppState<S>>>,
    Path((from, to, quantity)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let pair = CurrencyPair::parse(&from, &to).map_err(AppError::from)?;
    let quantity: Quantity = quantity.parse().map_err(AppError::from)?;

    let result = state.service.convert(pair, quantity).await;
    Ok(Json(result))
}
