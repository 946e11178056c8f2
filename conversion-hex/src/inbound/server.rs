//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use conversion_types::RemoteRateSource;

use super::handlers::{self, AppState};
use crate::RateResolutionService;

/// HTTP Server for the Currency Conversion API.
pub struct HttpServer<S: RemoteRateSource> {
    state: Arc<AppState<S>>,
}

impl<S: RemoteRateSource> HttpServer<S> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: RateResolutionService<S>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// The service behind the handlers.
    pub fn service(&self) -> &RateResolutionService<S> {
        &self.state.service
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/health/providers",
                get(handlers::provider_statuses::<S>),
            )
            .route(
                "/currencyconversion/{from}/to/{to}/{quantity}/calculate",
                get(handlers::convert::<S>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
