use async_trait::async_trait;
use chrono::FixedOffset;
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

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeather reports m/s and metres, icons by short code ("10d").
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWeatherFormat;

impl ObservationFormat for OpenWeatherFormat {
    fn wind_unit(&self) -> SpeedUnit {
        SpeedUnit::MetersPerSecond
    }

    fn distance_unit(&self) -> DistanceUnit {
        DistanceUnit::Meters
    }

    fn icon_url(&self, icon_code: &str) -> String {
        format!("https://openweathermap.org/img/wn/{icon_code}@2x.png")
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    lang: Option<String>,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: None,
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

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    fn query(&self, location: &Location) -> Vec<(&'static str, String)> {
        let mut query = match location {
            Location::City(name) => vec![("q", name.clone())],
            Location::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };

        query.push(("appid", self.api_key.clone()));
        query.push(("units", "metric".to_string()));
        if let Some(lang) = &self.lang {
            query.push(("lang", lang.clone()));
        }

        query
    }

    #[instrument(skip(self), fields(provider = "openweather"))]
    async fn fetch_current(&self, location: &Location) -> WeatherResult<CurrentConditions> {
        let url = format!("{}/weather", self.base_url);
        debug!(%url, "requesting current weather");

        let request = self.http.get(&url).query(&self.query(location));
        let parsed: OwCurrentResponse =
            fetch_json(ProviderId::OpenWeather, request, location).await?;

        let location_name = location_label(&parsed.name, parsed.sys.country.as_deref());
        let coordinates = parsed.coord.into();
        let raw = parsed.into_raw();

        Ok(CurrentConditions {
            location: location_name,
            coordinates,
            observation: format_observation(&raw, &OpenWeatherFormat),
        })
    }

    #[instrument(skip(self), fields(provider = "openweather"))]
    async fn fetch_forecast(&self, location: &Location) -> WeatherResult<ForecastResult> {
        let url = format!("{}/forecast", self.base_url);
        debug!(%url, "requesting 5-day forecast");

        let request = self.http.get(&url).query(&self.query(location));
        let parsed: OwForecastResponse =
            fetch_json(ProviderId::OpenWeather, request, location).await?;

        let observations = parsed
            .list
            .into_iter()
            .map(|entry| format_observation(&entry.into_raw(), &OpenWeatherFormat))
            .collect();

        Ok(build_forecast(
            location_label(&parsed.city.name, parsed.city.country.as_deref()),
            parsed.city.coord.into(),
            utc_offset_label(parsed.city.timezone),
            observations,
        ))
    }
}

fn location_label(name: &str, country: Option<&str>) -> String {
    match country {
        Some(country) if !country.is_empty() => format!("{name}, {country}"),
        _ => name.to_string(),
    }
}

/// OpenWeather only gives a UTC offset in seconds, so label it as such.
fn utc_offset_label(offset_secs: i32) -> String {
    FixedOffset::east_opt(offset_secs)
        .map(|offset| format!("UTC{offset}"))
        .unwrap_or_else(|| "UTC".to_string())
}

fn first_condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
    gust: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    all: u8,
}

/// A present `rain` object counts as rain even without an amount.
#[derive(Debug, Deserialize)]
struct OwPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

impl From<OwCoord> for Coordinates {
    fn from(coord: OwCoord) -> Self {
        Coordinates { lat: coord.lat, lon: coord.lon }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<f64>,
    #[serde(default)]
    clouds: OwClouds,
    rain: Option<OwPrecipitation>,
    snow: Option<OwPrecipitation>,
    #[serde(default)]
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_raw(self) -> RawObservation {
        let (description, icon_code) = first_condition(&self.weather);

        RawObservation {
            timestamp: self.dt,
            local_time: None,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_degrees: self.wind.deg,
            wind_gust: self.wind.gust,
            visibility: self.visibility,
            cloudiness: self.clouds.all,
            rain: self.rain.map(|r| r.one_hour.unwrap_or(0.0)),
            snow: self.snow.and_then(|s| s.one_hour),
            description,
            icon_code,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: Option<String>,
    coord: OwCoord,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: Option<String>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<f64>,
    #[serde(default)]
    clouds: OwClouds,
    rain: Option<OwPrecipitation>,
    snow: Option<OwPrecipitation>,
}

impl OwForecastEntry {
    fn into_raw(self) -> RawObservation {
        let (description, icon_code) = first_condition(&self.weather);

        RawObservation {
            timestamp: self.dt,
            local_time: self.dt_txt,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_degrees: self.wind.deg,
            wind_gust: self.wind.gust,
            visibility: self.visibility,
            cloudiness: self.clouds.all,
            rain: self.rain.map(|r| r.three_hours.unwrap_or(0.0)),
            snow: self.snow.and_then(|s| s.three_hours),
            description,
            icon_code,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
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
    fn icon_url_uses_2x_png() {
        assert_eq!(
            OpenWeatherFormat.icon_url("10d"),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
    }

    #[test]
    fn utc_offset_label_formats_sign() {
        assert_eq!(utc_offset_label(3600), "UTC+01:00");
        assert_eq!(utc_offset_label(-18_000), "UTC-05:00");
        assert_eq!(utc_offset_label(0), "UTC+00:00");
    }

    #[test]
    fn location_label_skips_missing_country() {
        assert_eq!(location_label("Madrid", Some("ES")), "Madrid, ES");
        assert_eq!(location_label("Madrid", None), "Madrid");
    }

    #[test]
    fn query_for_city_and_coordinates() {
        let provider = OpenWeatherProvider::new("KEY".into()).with_lang("es");

        let city = provider.query(&Location::city("Sevilla"));
        assert!(city.contains(&("q", "Sevilla".to_string())));
        assert!(city.contains(&("appid", "KEY".to_string())));
        assert!(city.contains(&("units", "metric".to_string())));
        assert!(city.contains(&("lang", "es".to_string())));

        let coords = provider.query(&Location::Coordinates { lat: 37.38, lon: -5.98 });
        assert!(coords.contains(&("lat", "37.38".to_string())));
        assert!(coords.contains(&("lon", "-5.98".to_string())));
        assert!(!coords.iter().any(|(k, _)| *k == "q"));
    }

    #[test]
    fn forecast_entry_maps_to_raw() {
        let entry: OwForecastEntry = serde_json::from_value(serde_json::json!({
            "dt": 1705320000,
            "dt_txt": "2024-01-15 12:00:00",
            "main": { "temp": 11.6, "feels_like": 9.4, "pressure": 1012, "humidity": 81 },
            "weather": [{ "description": "light snow", "icon": "13d" }],
            "wind": { "speed": 5.0, "deg": 202 },
            "clouds": { "all": 75 },
            "snow": { "3h": 0.8 }
        }))
        .unwrap();

        let raw = entry.into_raw();
        assert_eq!(raw.local_time.as_deref(), Some("2024-01-15 12:00:00"));
        assert_eq!(raw.rain, None);
        assert_eq!(raw.snow, Some(0.8));
        assert_eq!(raw.wind_gust, None);
        assert_eq!(raw.visibility, None);
        assert_eq!(raw.icon_code, "13d");
    }

    #[test]
    fn rain_object_without_amount_shadows_snow() {
        let entry: OwForecastEntry = serde_json::from_value(serde_json::json!({
            "dt": 1705330800,
            "dt_txt": "2024-01-15 15:00:00",
            "main": { "temp": 1.2, "feels_like": -1.5, "pressure": 1008, "humidity": 93 },
            "weather": [{ "description": "sleet", "icon": "13d" }],
            "wind": { "speed": 3.1, "deg": 10 },
            "rain": {},
            "snow": { "3h": 0.6 }
        }))
        .unwrap();

        let raw = entry.into_raw();
        assert_eq!(raw.rain, Some(0.0));

        let obs = format_observation(&raw, &OpenWeatherFormat);
        assert_eq!(obs.precipitation, 0.0);
    }
}
