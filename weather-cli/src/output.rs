//! Plain-text rendering of weather data for the terminal.

use std::fmt;

use weather_core::{CurrentConditions, NormalizedObservation, view::ForecastView};

/// Current conditions as a short multi-line report.
pub struct CurrentReport<'a>(pub &'a CurrentConditions);

impl fmt::Display for CurrentReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.0;
        let obs = &current.observation;
        let coords = current.coordinates;

        writeln!(f, "{} ({:.2}, {:.2})", current.location, coords.lat, coords.lon)?;
        writeln!(f, "{}", obs.date_time)?;
        writeln!(
            f,
            "{}°C (feels like {}°C), {}",
            obs.temperature, obs.feels_like, obs.description
        )?;
        writeln!(f, "Humidity:    {}%", obs.humidity)?;
        writeln!(f, "Pressure:    {} hPa", obs.pressure)?;
        writeln!(f, "Wind:        {}", Wind(obs))?;
        writeln!(f, "Cloudiness:  {}%", obs.cloudiness)?;
        if let Some(km) = obs.visibility {
            writeln!(f, "Visibility:  {km} km")?;
        }
        if obs.precipitation > 0.0 {
            writeln!(f, "Precip.:     {} mm", obs.precipitation)?;
        }

        Ok(())
    }
}

/// The selected forecast day, its summary and the hours that pass the filter.
pub struct ForecastReport<'a>(pub &'a ForecastView);

impl fmt::Display for ForecastReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let result = view.forecast();

        writeln!(f, "{} [{}]", result.location, result.timezone)?;

        let Some(day) = view.selected() else {
            return writeln!(f, "No forecast data available.");
        };

        writeln!(
            f,
            "Day {}/{}: {}  {}°C .. {}°C, {}",
            view.selected_index() + 1,
            view.days().len(),
            day.date,
            day.temp_min,
            day.temp_max,
            day.dominant_description
        )?;

        write!(f, "Humidity avg {}%, wind max {} km/h", day.avg_humidity, day.max_wind_speed)?;
        match day.max_wind_gust {
            Some(gust) => writeln!(f, ", gusts {gust} km/h")?,
            None => writeln!(f)?,
        }

        let hours = view.visible_hours();
        if hours.is_empty() {
            return writeln!(f, "No hours in the selected window.");
        }

        for obs in hours {
            writeln!(
                f,
                "  {:<19}  {:>4}°C  {:>3}%  {:<24}  {}",
                obs.date_time,
                obs.temperature,
                obs.humidity,
                Wind(obs).to_string(),
                obs.description
            )?;
        }

        Ok(())
    }
}

struct Wind<'a>(&'a NormalizedObservation);

impl fmt::Display for Wind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obs = self.0;
        write!(f, "{} km/h {}", obs.wind_speed, obs.wind_direction)?;
        if let Some(gust) = obs.wind_gust {
            write!(f, " (gusts {gust})")?;
        }
        Ok(())
    }
}
