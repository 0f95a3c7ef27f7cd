//! HTTP proxy for OrientAll
//!
//! Serves `/api/weather`, `/api/orientation` and `/api/health` so a thin
//! browser shell never holds the AI credential.

pub mod api;

pub use api::AppState;

use axum::Router;
use orientall_core::{AppError, ServerConfig};
use orientall_weather::WeatherService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn app(service: WeatherService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(AppState { weather: service }))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, service: WeatherService) -> Result<(), AppError> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!(%addr, weather_configured = service.is_configured(), "OrientAll proxy listening");

    axum::serve(listener, app(service)).await?;
    Ok(())
}
