use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    aggregate::build_forecast,
    error::WeatherResult,
    format::{ObservationFormat, format_observation},
    model::{Coordinates, CurrentConditions, ForecastResult, Location, RawObservation},
    provider::{ProviderId, fetch_json},
    units::{DistanceUnit, SpeedUnit},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// WeatherAPI.com reports km/h and km. Icons come as protocol-relative CDN
/// paths at 64x64; we serve the 128x128 variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherApiFormat;

impl ObservationFormat for WeatherApiFormat {
    fn wind_unit(&self) -> SpeedUnit {
        SpeedUnit::KilometersPerHour
    }

    fn distance_unit(&self) -> DistanceUnit {
        DistanceUnit::Kilometers
    }

    fn icon_url(&self, icon_code: &str) -> String {
        let absolute = if icon_code.starts_with("//") {
            format!("https:{icon_code}")
        } else {
            icon_code.to_string()
        };
        absolute.replace("/64x64/", "/128x128/")
    }
}

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    lang: Option<String>,
    forecast_days: u8,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: None,
            forecast_days: 3,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Number of forecast days to request, clamped to what the API accepts.
    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days.clamp(1, 14);
        self
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    fn query(&self, location: &Location) -> Vec<(&'static str, String)> {
        let q = match location {
            Location::City(name) => name.clone(),
            Location::Coordinates { lat, lon } => format!("{lat},{lon}"),
        };

        let mut query = vec![("key", self.api_key.clone()), ("q", q)];
        if let Some(lang) = &self.lang {
            query.push(("lang", lang.clone()));
        }

        query
    }

    #[instrument(skip(self), fields(provider = "weatherapi"))]
    async fn fetch_current(&self, location: &Location) -> WeatherResult<CurrentConditions> {
        let url = format!("{}/current.json", self.base_url);
        debug!(%url, "requesting current weather");

        let request = self.http.get(&url).query(&self.query(location));
        let parsed: WaResponse = fetch_json(ProviderId::WeatherApi, request, location).await?;

        Ok(CurrentConditions {
            location: parsed.location.label(),
            coordinates: parsed.location.coordinates(),
            observation: format_observation(&parsed.current.into_raw(), &WeatherApiFormat),
        })
    }

    #[instrument(skip(self), fields(provider = "weatherapi"))]
    async fn fetch_forecast(&self, location: &Location) -> WeatherResult<ForecastResult> {
        let url = format!("{}/forecast.json", self.base_url);
        debug!(%url, days = self.forecast_days, "requesting forecast");

        let mut query = self.query(location);
        query.push(("days", self.forecast_days.to_string()));

        let request = self.http.get(&url).query(&query);
        let parsed: WaForecastResponse =
            fetch_json(ProviderId::WeatherApi, request, location).await?;

        let observations = parsed
            .forecast
            .forecastday
            .into_iter()
            .flat_map(|day| day.hour)
            .map(|hour| format_observation(&hour.into_raw(), &WeatherApiFormat))
            .collect();

        Ok(build_forecast(
            parsed.location.label(),
            parsed.location.coordinates(),
            parsed.location.tz_id.clone(),
            observations,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tz_id: String,
}

impl WaLocation {
    fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }

    fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.lat, lon: self.lon }
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

/// Fields shared by `current` and each forecast `hour` entry.
#[derive(Debug, Deserialize)]
struct WaReading {
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    pressure_mb: f64,
    wind_kph: f64,
    wind_degree: Option<f64>,
    gust_kph: Option<f64>,
    vis_km: Option<f64>,
    #[serde(default)]
    cloud: u8,
    precip_mm: Option<f64>,
    snow_cm: Option<f64>,
    condition: WaCondition,
}

impl WaReading {
    fn into_raw(self, timestamp: i64, local_time: Option<String>) -> RawObservation {
        RawObservation {
            timestamp,
            local_time,
            temperature: self.temp_c,
            feels_like: self.feelslike_c,
            humidity: self.humidity,
            pressure: self.pressure_mb,
            wind_speed: self.wind_kph,
            wind_degrees: self.wind_degree,
            wind_gust: self.gust_kph,
            visibility: self.vis_km,
            cloudiness: self.cloud,
            // precip_mm is always sent; zero means "nothing fell", so let snow speak.
            rain: self.precip_mm.filter(|mm| *mm > 0.0),
            snow: self.snow_cm.map(|cm| cm * 10.0),
            description: self.condition.text,
            icon_code: self.condition.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    last_updated_epoch: i64,
    last_updated: Option<String>,
    #[serde(flatten)]
    reading: WaReading,
}

impl WaCurrent {
    fn into_raw(self) -> RawObservation {
        self.reading.into_raw(self.last_updated_epoch, self.last_updated)
    }
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time_epoch: i64,
    time: Option<String>,
    #[serde(flatten)]
    reading: WaReading,
}

impl WaForecastHour {
    fn into_raw(self) -> RawObservation {
        self.reading.into_raw(self.time_epoch, self.time)
    }
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    forecast: WaForecast,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    async fn current(&self, location: &Location) -> WeatherResult<CurrentConditions> {
        self.fetch_current(location).await
    }

    async fn forecast(&self, location: &Location) -> WeatherResult<ForecastResult> {
        self.fetch_forecast(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_url_is_absolute_and_upscaled() {
        assert_eq!(
            WeatherApiFormat.icon_url("//cdn.weatherapi.com/weather/64x64/day/113.png"),
            "https://cdn.weatherapi.com/weather/128x128/day/113.png"
        );
        assert_eq!(
            WeatherApiFormat.icon_url("https://cdn.weatherapi.com/weather/64x64/night/116.png"),
            "https://cdn.weatherapi.com/weather/128x128/night/116.png"
        );
    }

    #[test]
    fn coordinates_are_sent_as_single_q() {
        let provider = WeatherApiProvider::new("KEY".into());
        let query = provider.query(&Location::Coordinates { lat: 40.42, lon: -3.7 });

        assert!(query.contains(&("q", "40.42,-3.7".to_string())));
        assert!(query.contains(&("key", "KEY".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "lang"));
    }

    #[test]
    fn forecast_days_are_clamped() {
        assert_eq!(WeatherApiProvider::new("K".into()).with_forecast_days(0).forecast_days, 1);
        assert_eq!(WeatherApiProvider::new("K".into()).with_forecast_days(30).forecast_days, 14);
    }

    #[test]
    fn hour_without_precipitation_falls_back_to_snow() {
        let hour: WaForecastHour = serde_json::from_value(serde_json::json!({
            "time_epoch": 1705320000,
            "time": "2024-01-15 12:00",
            "temp_c": -1.2,
            "feelslike_c": -4.0,
            "humidity": 90,
            "pressure_mb": 1020.0,
            "wind_kph": 14.4,
            "wind_degree": 350,
            "vis_km": 2.0,
            "cloud": 100,
            "precip_mm": 0.0,
            "snow_cm": 2.5,
            "condition": { "text": "Light snow", "icon": "//cdn.weatherapi.com/weather/64x64/day/326.png" }
        }))
        .unwrap();

        let raw = hour.into_raw();
        assert_eq!(raw.rain, None);
        assert_eq!(raw.snow, Some(25.0));
        assert_eq!(raw.wind_gust, None);
        assert_eq!(raw.local_time.as_deref(), Some("2024-01-15 12:00"));
    }

    #[test]
    fn snowfall_is_reported_in_millimetres() {
        let hour: WaForecastHour = serde_json::from_value(serde_json::json!({
            "time_epoch": 1705330800,
            "time": "2024-01-15 15:00",
            "temp_c": -2.0,
            "feelslike_c": -5.0,
            "humidity": 92,
            "pressure_mb": 1019.0,
            "wind_kph": 10.8,
            "cloud": 100,
            "precip_mm": 0.0,
            "snow_cm": 1.1,
            "condition": { "text": "Moderate snow", "icon": "//cdn.weatherapi.com/weather/64x64/day/332.png" }
        }))
        .unwrap();

        let obs = format_observation(&hour.into_raw(), &WeatherApiFormat);
        assert!((obs.precipitation - 11.0).abs() < 1e-9, "got {}", obs.precipitation);
    }

    #[test]
    fn measured_rain_wins_over_snow() {
        let hour: WaForecastHour = serde_json::from_value(serde_json::json!({
            "time_epoch": 1705330800,
            "temp_c": 0.5,
            "feelslike_c": -2.0,
            "humidity": 95,
            "pressure_mb": 1010.0,
            "wind_kph": 7.2,
            "precip_mm": 1.4,
            "snow_cm": 0.3,
            "condition": { "text": "Light sleet" }
        }))
        .unwrap();

        let obs = format_observation(&hour.into_raw(), &WeatherApiFormat);
        assert_eq!(obs.precipitation, 1.4);
    }
}
