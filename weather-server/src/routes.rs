//! Route definitions

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use weather_core::ServerConfig;

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and static payloads
        .route("/health", get(handlers::system::health))
        .route("/api/test", get(handlers::system::test))
        .route("/api/saludo", get(handlers::system::saludo))
        // Current conditions
        .route("/api/weather/{city}", get(handlers::weather::current_by_city))
        .route(
            "/api/weather/coords/{lat}/{lon}",
            get(handlers::weather::current_by_coords),
        )
        // Forecast with daily summaries
        .route("/api/forecast/{city}", get(handlers::forecast::forecast_by_city))
        .route(
            "/api/forecast/coords/{lat}/{lon}",
            get(handlers::forecast::forecast_by_coords),
        )
        .fallback(handlers::system::not_found)
        // Attach state
        .with_state(state)
}

/// CORS policy: any origin unless the config lists allowed ones.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}
