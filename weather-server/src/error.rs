//! API error handling
//!
//! Upstream failures are logged in full and answered with a short,
//! user-facing message. Nothing from the provider body reaches the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use weather_core::WeatherError;

pub const CITY_NOT_FOUND: &str = "Ciudad no encontrada. Verifica el nombre e intenta nuevamente.";
pub const FORECAST_CITY_NOT_FOUND: &str =
    "Ciudad no encontrada para el pronóstico. Verifica el nombre e intenta nuevamente.";
pub const WEATHER_FAILED: &str = "Error interno del servidor al obtener el clima";
pub const FORECAST_FAILED: &str = "Error al obtener el pronóstico detallado";
pub const ROUTE_NOT_FOUND: &str = "Ruta no encontrada";

/// Which kind of lookup failed; picks the user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Weather,
    Forecast,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    /// Map a provider failure to a response, logging the underlying cause.
    pub fn from_weather(err: WeatherError, lookup: Lookup) -> Self {
        match err {
            WeatherError::LocationNotFound { query } => {
                warn!(%query, ?lookup, "location not found upstream");
                let msg = match lookup {
                    Lookup::Weather => CITY_NOT_FOUND,
                    Lookup::Forecast => FORECAST_CITY_NOT_FOUND,
                };
                Self::NotFound(msg.to_string())
            }
            invalid @ WeatherError::InvalidCoordinates => Self::BadRequest(invalid.to_string()),
            other => {
                error!(error = %other, ?lookup, "weather provider request failed");
                let msg = match lookup {
                    Lookup::Weather => WEATHER_FAILED,
                    Lookup::Forecast => FORECAST_FAILED,
                };
                Self::Internal(msg.to_string())
            }
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self::from_weather(err, Lookup::Weather)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
