use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use tracing::{debug, info};
use weather_core::{
    Config, Location, ProviderId, WeatherError, default_provider_from_config,
    view::{ForecastScreen, HourRange, ViewStatus},
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// Show current conditions for a city or "lat,lon" pair.
    Show {
        /// City name or coordinates.
        address: String,
    },

    /// Show the hourly forecast, one day at a time.
    Forecast {
        /// City name or coordinates.
        address: String,

        /// Day to display, starting at 1.
        #[arg(long, default_value_t = 1)]
        day: usize,

        /// Only list hours within this window, e.g. 06-18.
        #[arg(long)]
        hours: Option<HourRange>,
    },

    /// List supported providers and whether each has an API key.
    Providers,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { address } => show(&address).await,
            Command::Forecast { address, day, hours } => forecast(&address, day, hours).await,
            Command::Providers => providers(),
        }
    }
}

fn configure(provider: &str) -> Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.trim().to_string());

    let already_default = config.default_provider_id().is_ok_and(|current| current == id);
    if !already_default {
        let make_default = Confirm::new(&format!("Use {id} as the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    info!(provider = %id, "provider configured");
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(address: &str) -> Result<()> {
    let location = parse_address(address)?;
    let config = Config::load_with_env()?;
    let provider = default_provider_from_config(&config)?;
    debug!(provider = %provider.id(), %location, "fetching current conditions");

    let current = provider.current(&location).await.map_err(|e| friendly(e, address))?;
    print!("{}", output::CurrentReport(&current));

    Ok(())
}

async fn forecast(address: &str, day: usize, hours: Option<HourRange>) -> Result<()> {
    let location = parse_address(address)?;
    let config = Config::load_with_env()?;
    let provider = default_provider_from_config(&config)?;

    let mut screen = ForecastScreen::default();
    screen.begin_loading();
    debug!(provider = %provider.id(), %location, "fetching forecast");

    match provider.forecast(&location).await {
        Ok(result) => screen.loaded(result),
        Err(e) => screen.failed(format!("{:#}", friendly(e, address))),
    }

    print!("{}", render_forecast(&mut screen, day, hours)?);

    Ok(())
}

/// Apply the day and hour selection to a finished screen and render it.
fn render_forecast(
    screen: &mut ForecastScreen,
    day: usize,
    hours: Option<HourRange>,
) -> Result<String> {
    match screen.status() {
        ViewStatus::Ready => {}
        ViewStatus::Failed(message) => anyhow::bail!("{message}"),
        ViewStatus::Idle | ViewStatus::Loading => anyhow::bail!("Forecast has not loaded yet"),
    }

    let Some(view) = screen.view_mut() else {
        anyhow::bail!("Forecast did not load");
    };

    if day == 0 {
        anyhow::bail!("Days are numbered from 1");
    }
    view.select_day(day - 1)?;
    view.set_hour_filter(hours);

    Ok(output::ForecastReport(view).to_string())
}

fn providers() -> Result<()> {
    let config = Config::load_with_env()?;
    let default = config.default_provider_id().ok();

    for id in ProviderId::all() {
        let status = if config.is_provider_configured(*id) { "configured" } else { "no API key" };
        let marker = if default == Some(*id) { " (default)" } else { "" };
        println!("{id}{marker}: {status}");
    }

    Ok(())
}

/// Accepts "lat,lon" coordinates or a city name.
fn parse_address(address: &str) -> Result<Location> {
    let address = address.trim();
    if address.is_empty() {
        anyhow::bail!("Address must not be empty");
    }

    if let Some((lat, lon)) = address.split_once(',')
        && let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>())
    {
        return Location::coordinates(lat, lon)
            .with_context(|| format!("'{address}' is not a valid coordinate pair"));
    }

    Ok(Location::city(address))
}

fn friendly(err: WeatherError, address: &str) -> anyhow::Error {
    if err.is_not_found() {
        anyhow::anyhow!("Location '{address}' was not found. Check the spelling and try again.")
    } else {
        anyhow::Error::new(err).context("Failed to fetch weather data")
    }
}
