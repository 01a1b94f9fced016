//! Hourly forecast with daily summaries

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{debug, instrument};
use weather_core::ForecastResult;

use super::{city_location, coordinate_location};
use crate::{
    error::{ApiError, Lookup},
    state::AppState,
};

/// `GET /api/forecast/{city}`
#[instrument(skip(state))]
pub async fn forecast_by_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<ForecastResult>, ApiError> {
    let location = city_location(&city)?;
    fetch(&state, &location).await
}

/// `GET /api/forecast/coords/{lat}/{lon}`
#[instrument(skip(state))]
pub async fn forecast_by_coords(
    State(state): State<AppState>,
    Path((lat, lon)): Path<(String, String)>,
) -> Result<Json<ForecastResult>, ApiError> {
    let location = coordinate_location(&lat, &lon)?;
    fetch(&state, &location).await
}

async fn fetch(
    state: &AppState,
    location: &weather_core::Location,
) -> Result<Json<ForecastResult>, ApiError> {
    let forecast = state
        .provider
        .forecast(location)
        .await
        .map_err(|e| ApiError::from_weather(e, Lookup::Forecast))?;

    debug!(
        hours = forecast.total_hours,
        days = forecast.total_days,
        "forecast aggregated"
    );

    Ok(Json(forecast))
}
