//! HTTP request handlers

pub mod forecast;
pub mod system;
pub mod weather;

use weather_core::Location;

use crate::error::ApiError;

/// Build a city query from a path segment.
pub(crate) fn city_location(city: &str) -> Result<Location, ApiError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(ApiError::BadRequest("City name must not be empty".to_string()));
    }
    Ok(Location::city(city))
}

/// Build a coordinate query from raw path segments.
///
/// Parsed here rather than by the extractor so malformed input gets the
/// same JSON error body as everything else.
pub(crate) fn coordinate_location(lat: &str, lon: &str) -> Result<Location, ApiError> {
    let parse = |value: &str, name: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid {name} '{value}'")))
    };

    let lat = parse(lat, "latitude")?;
    let lon = parse(lon, "longitude")?;
    Location::coordinates(lat, lon).map_err(ApiError::from)
}
