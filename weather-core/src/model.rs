use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{WeatherError, WeatherResult};

/// What the caller asked weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Location {
    pub fn city(name: impl Into<String>) -> Self {
        Location::City(name.into())
    }

    /// Build a coordinate query, rejecting values outside the globe.
    pub fn coordinates(lat: f64, lon: f64) -> WeatherResult<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(Location::Coordinates { lat, lon })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::City(name) => f.write_str(name),
            Location::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One provider record with its values still in provider units.
///
/// Each provider maps its own wire format into this shape; the formatter
/// then erases the unit differences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObservation {
    pub timestamp: i64,
    /// Provider-local datetime text, when the provider sends one.
    pub local_time: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_degrees: Option<f64>,
    pub wind_gust: Option<f64>,
    pub visibility: Option<f64>,
    pub cloudiness: u8,
    pub rain: Option<f64>,
    pub snow: Option<f64>,
    pub description: String,
    pub icon_code: String,
}

/// A single reading in the simplified schema returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedObservation {
    pub date_time: String,
    pub timestamp: i64,
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: u32,
    pub wind_direction: String,
    pub wind_degrees: f64,
    pub wind_gust: Option<u32>,
    pub visibility: Option<u32>,
    pub cloudiness: u8,
    pub precipitation: f64,
    pub description: String,
    pub icon: String,
}

/// Statistics over all observations that share a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub temp_min: i32,
    pub temp_max: i32,
    pub avg_humidity: u8,
    pub max_wind_speed: u32,
    pub max_wind_gust: Option<u32>,
    pub dominant_description: String,
    pub hourly_data: Vec<NormalizedObservation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub location: String,
    pub coordinates: Coordinates,
    pub timezone: String,
    pub total_hours: usize,
    pub total_days: usize,
    pub hourly_forecast: Vec<NormalizedObservation>,
    pub daily_summary: Vec<DailySummary>,
}

/// Current conditions: one normalized reading plus where it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub location: String,
    pub coordinates: Coordinates,
    #[serde(flatten)]
    pub observation: NormalizedObservation,
}
