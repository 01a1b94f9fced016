//! Core library for the weather service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers (OpenWeather, WeatherAPI.com)
//! - Unit normalization and the per-observation formatter
//! - Grouping of observations into daily summaries
//! - View state for browsing a forecast
//!
//! It is used by `weather-cli` and `weather-server`.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;
pub mod units;
pub mod view;

pub use aggregate::{build_forecast, summarize_days};
pub use config::{Config, ProviderConfig, ServerConfig};
pub use error::{WeatherError, WeatherResult};
pub use format::{ObservationFormat, format_observation};
pub use model::{
    Coordinates, CurrentConditions, DailySummary, ForecastResult, Location,
    NormalizedObservation, RawObservation,
};
pub use provider::{ProviderId, WeatherProvider, default_provider_from_config};
