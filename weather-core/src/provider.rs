use crate::{
    Config,
    error::{WeatherError, WeatherResult},
    model::{CurrentConditions, ForecastResult, Location},
    provider::{openweather::OpenWeatherProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug, time::Duration};
use tracing::{debug, warn};

pub mod openweather;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi."
            )),
        }
    }
}

/// An upstream weather API, already reshaped into the simplified schema.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    /// Current conditions at `location`.
    async fn current(&self, location: &Location) -> WeatherResult<CurrentConditions>;

    /// Hourly forecast at `location` with its per-day summary.
    async fn forecast(&self, location: &Location) -> WeatherResult<ForecastResult>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider_cfg = config.provider_config(id).filter(|_| config.is_provider_configured(id));
    let provider_cfg = provider_cfg.ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weather configure {id}` and enter your API key."
        )
    })?;

    let http = Client::builder()
        .timeout(Duration::from_secs(config.server.request_timeout_secs))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => {
            let mut provider = OpenWeatherProvider::new(provider_cfg.api_key.clone())
                .with_http_client(http);
            if let Some(base_url) = &provider_cfg.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            if let Some(lang) = &provider_cfg.lang {
                provider = provider.with_lang(lang.clone());
            }
            Box::new(provider)
        }
        ProviderId::WeatherApi => {
            let mut provider = WeatherApiProvider::new(provider_cfg.api_key.clone())
                .with_http_client(http)
                .with_forecast_days(config.forecast_days);
            if let Some(base_url) = &provider_cfg.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            if let Some(lang) = &provider_cfg.lang {
                provider = provider.with_lang(lang.clone());
            }
            Box::new(provider)
        }
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

/// Send `request` and decode a JSON body, mapping upstream statuses.
///
/// 404 and 400 both mean the provider could not resolve `location`; any
/// other non-success status is reported as [`WeatherError::Upstream`].
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: ProviderId,
    request: RequestBuilder,
    location: &Location,
) -> WeatherResult<T> {
    let res = request.send().await?;
    let status = res.status();
    let body = res.text().await?;

    if status.as_u16() == 404 || status.as_u16() == 400 {
        warn!(%provider, %location, %status, "provider could not resolve location");
        return Err(WeatherError::LocationNotFound { query: location.to_string() });
    }

    if !status.is_success() {
        warn!(%provider, %status, "provider request failed");
        return Err(WeatherError::Upstream { status: status.as_u16(), body: truncate_body(&body) });
    }

    debug!(%provider, bytes = body.len(), "provider response received");
    Ok(serde_json::from_str(&body)?)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
