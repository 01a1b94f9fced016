//! Current conditions

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{debug, instrument};
use weather_core::CurrentConditions;

use super::{city_location, coordinate_location};
use crate::{
    error::{ApiError, Lookup},
    state::AppState,
};

/// `GET /api/weather/{city}`
#[instrument(skip(state))]
pub async fn current_by_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<CurrentConditions>, ApiError> {
    let location = city_location(&city)?;
    debug!(provider = %state.provider.id(), "fetching current weather");

    let current = state
        .provider
        .current(&location)
        .await
        .map_err(|e| ApiError::from_weather(e, Lookup::Weather))?;

    Ok(Json(current))
}

/// `GET /api/weather/coords/{lat}/{lon}`
#[instrument(skip(state))]
pub async fn current_by_coords(
    State(state): State<AppState>,
    Path((lat, lon)): Path<(String, String)>,
) -> Result<Json<CurrentConditions>, ApiError> {
    let location = coordinate_location(&lat, &lon)?;

    let current = state
        .provider
        .current(&location)
        .await
        .map_err(|e| ApiError::from_weather(e, Lookup::Weather))?;

    Ok(Json(current))
}
