//! Health, greeting and fallback handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ROUTE_NOT_FOUND},
    state::AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingResponse {
    pub mensaje: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
}

/// `GET /api/test`
pub async fn test() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "API del clima funcionando correctamente! 🌤️".to_string(),
    })
}

/// `GET /api/saludo`
pub async fn saludo() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        mensaje: "Hola desde el backend del clima!".to_string(),
    })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.provider.id().to_string(),
    })
}

/// Anything no route matched.
pub async fn not_found() -> ApiError {
    ApiError::NotFound(ROUTE_NOT_FOUND.to_string())
}
