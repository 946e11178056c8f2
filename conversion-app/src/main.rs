//! # Currency Conversion Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the remote exchange client
//! - Construct the resilience stack, rate cache and fallback chain once
//! - Create the rate resolution service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use conversion_client::ExchangeClient;
use conversion_hex::{
    FallbackOrchestrator, RateCache, RateResolutionService, ResilienceStack, ResolutionSettings,
    inbound::HttpServer,
};
use conversion_types::StaticRateTable;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,conversion_app=debug,conversion_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown-host".to_string());

    tracing::info!("Starting currency conversion server on port {}", config.port);
    tracing::info!("Using exchange service: {}", config.exchange_service_url);
    tracing::debug!(policies = ?config.policies, "Resilience policies");

    // Outbound adapter
    let remote = ExchangeClient::new(&config.exchange_service_url, config.remote_http_timeout)?;

    // Process-wide policy and fallback state
    let stack = ResilienceStack::new(config.policies.clone())?;
    let cache = Arc::new(RateCache::new());
    let sweeper = cache.clone().spawn_sweeper(config.cache_sweep_interval);
    let fallback = FallbackOrchestrator::standard(cache.clone(), StaticRateTable::standard());

    // Create the rate resolution service
    let service = RateResolutionService::new(
        remote,
        stack,
        cache,
        fallback,
        ResolutionSettings {
            cache_ttl: config.cache_ttl,
            request_timeout: config.request_timeout,
            environment: config.environment(&hostname),
        },
    );

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    let result = server.run(&addr).await;

    sweeper.abort();
    result
}
