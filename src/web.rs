use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, http::HeaderValue, routing::get};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::{
    GatewayError, api,
    api::AppState,
    config::{CorsConfig, GatewayConfig},
    weather::WeatherProvider,
};

const MAX_BODY_BYTES: usize = 16 * 1024;

/// Build the CORS policy from configuration
pub fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer> {
    if cors.is_wildcard() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = cors
        .allowed_origins
        .iter()
        .map(|origin| {
            let valid_scheme = origin.starts_with("http://") || origin.starts_with("https://");
            origin
                .parse::<HeaderValue>()
                .ok()
                .filter(|_| valid_scheme)
                .ok_or_else(|| GatewayError::config(format!("Invalid CORS origin '{origin}'")))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // credentials rule out `*` for methods and headers, so mirror the preflight
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Assemble the full application router
pub fn app(state: AppState, cors: &CorsConfig) -> Result<Router> {
    Ok(Router::new()
        .route("/health", get(api::health))
        .nest("/api", api::router(state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors)?))
}

pub async fn run(config: &GatewayConfig, provider: Arc<dyn WeatherProvider>) -> Result<()> {
    let app = app(AppState::new(provider), &config.server.cors)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Weather gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Weather gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
