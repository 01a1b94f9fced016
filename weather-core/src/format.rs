//! Turns a [`RawObservation`] into the client-facing [`NormalizedObservation`].

use chrono::DateTime;
use std::fmt::Debug;

use crate::{
    model::{NormalizedObservation, RawObservation},
    units::{self, DistanceUnit, SpeedUnit},
};

/// Per-provider formatting rules.
///
/// Providers differ in the units they report and in how an icon code maps
/// to an image URL; everything else about formatting is shared.
pub trait ObservationFormat: Send + Sync + Debug {
    fn wind_unit(&self) -> SpeedUnit;

    fn distance_unit(&self) -> DistanceUnit;

    fn icon_url(&self, icon_code: &str) -> String;
}

/// Normalize one raw record. Missing optional fields become `None`, `0` or
/// the `"N/A"` direction, never an error.
pub fn format_observation(
    raw: &RawObservation,
    format: &dyn ObservationFormat,
) -> NormalizedObservation {
    let wind_unit = format.wind_unit();

    NormalizedObservation {
        date_time: raw.local_time.clone().unwrap_or_else(|| display_time(raw.timestamp)),
        timestamp: raw.timestamp,
        temperature: units::round_to_i32(raw.temperature),
        feels_like: units::round_to_i32(raw.feels_like),
        humidity: raw.humidity,
        pressure: raw.pressure.round() as u32,
        wind_speed: units::wind_speed_kmh(raw.wind_speed, wind_unit),
        wind_direction: units::compass_label(raw.wind_degrees).to_string(),
        wind_degrees: raw.wind_degrees.unwrap_or(0.0),
        wind_gust: raw.wind_gust.map(|gust| units::wind_speed_kmh(gust, wind_unit)),
        visibility: units::distance_km(raw.visibility, format.distance_unit()),
        cloudiness: raw.cloudiness,
        precipitation: precipitation(raw),
        description: raw.description.clone(),
        icon: format.icon_url(&raw.icon_code),
    }
}

/// Rain if reported, otherwise snow, otherwise nothing. Never summed.
fn precipitation(raw: &RawObservation) -> f64 {
    raw.rain.or(raw.snow).unwrap_or(0.0)
}

fn display_time(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MetricFormat;

    impl ObservationFormat for MetricFormat {
        fn wind_unit(&self) -> SpeedUnit {
            SpeedUnit::MetersPerSecond
        }

        fn distance_unit(&self) -> DistanceUnit {
            DistanceUnit::Meters
        }

        fn icon_url(&self, icon_code: &str) -> String {
            format!("https://icons.test/{icon_code}.png")
        }
    }

    fn raw() -> RawObservation {
        RawObservation {
            timestamp: 1_705_320_000,
            local_time: Some("2024-01-15 12:00:00".into()),
            temperature: 11.6,
            feels_like: 9.4,
            humidity: 81,
            pressure: 1012.6,
            wind_speed: 5.0,
            wind_degrees: Some(202.0),
            wind_gust: Some(8.0),
            visibility: Some(10_000.0),
            cloudiness: 75,
            rain: None,
            snow: None,
            description: "light rain".into(),
            icon_code: "10d".into(),
        }
    }

    #[test]
    fn formats_a_complete_record() {
        let obs = format_observation(&raw(), &MetricFormat);

        assert_eq!(obs.date_time, "2024-01-15 12:00:00");
        assert_eq!(obs.temperature, 12);
        assert_eq!(obs.feels_like, 9);
        assert_eq!(obs.pressure, 1013);
        assert_eq!(obs.wind_speed, 18);
        assert_eq!(obs.wind_direction, "SSW");
        assert_eq!(obs.wind_degrees, 202.0);
        assert_eq!(obs.wind_gust, Some(29));
        assert_eq!(obs.visibility, Some(10));
        assert_eq!(obs.icon, "https://icons.test/10d.png");
    }

    #[test]
    fn missing_optionals_degrade_without_zeroing() {
        let mut record = raw();
        record.wind_degrees = None;
        record.wind_gust = None;
        record.visibility = None;

        let obs = format_observation(&record, &MetricFormat);
        assert_eq!(obs.wind_direction, "N/A");
        assert_eq!(obs.wind_degrees, 0.0);
        assert_eq!(obs.wind_gust, None);
        assert_eq!(obs.visibility, None);
    }

    #[test]
    fn zero_gust_is_kept() {
        let mut record = raw();
        record.wind_gust = Some(0.0);
        assert_eq!(format_observation(&record, &MetricFormat).wind_gust, Some(0));
    }

    #[test]
    fn precipitation_prefers_rain_then_snow() {
        let mut record = raw();
        assert_eq!(format_observation(&record, &MetricFormat).precipitation, 0.0);

        record.snow = Some(1.5);
        assert_eq!(format_observation(&record, &MetricFormat).precipitation, 1.5);

        record.rain = Some(0.4);
        assert_eq!(format_observation(&record, &MetricFormat).precipitation, 0.4);
    }

    #[test]
    fn falls_back_to_timestamp_for_display_time() {
        let mut record = raw();
        record.local_time = None;
        record.timestamp = 1_705_320_000;

        let obs = format_observation(&record, &MetricFormat);
        assert_eq!(obs.date_time, "2024-01-15 12:00:00");
    }
}
