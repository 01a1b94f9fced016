//! Unit conversions and wind direction labels.
//!
//! Nothing in here fails: absent inputs degrade to `None` or to the
//! [`NO_DIRECTION`] sentinel.

/// The 16 compass points, clockwise from north.
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Label used when the provider did not report a wind direction.
pub const NO_DIRECTION: &str = "N/A";

/// Unit a provider reports wind speed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    MetersPerSecond,
    KilometersPerHour,
}

/// Unit a provider reports visibility in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
}

/// Wind speed in whole km/h.
pub fn wind_speed_kmh(value: f64, unit: SpeedUnit) -> u32 {
    let kmh = match unit {
        SpeedUnit::MetersPerSecond => value * 3.6,
        SpeedUnit::KilometersPerHour => value,
    };
    // `as` saturates: negatives and NaN end up at 0.
    kmh.round() as u32
}

/// 16-point compass label for a direction in degrees.
pub fn compass_label(degrees: Option<f64>) -> &'static str {
    match degrees {
        Some(deg) if deg.is_finite() => {
            let index = (deg / 22.5).round() as i64;
            COMPASS_POINTS[index.rem_euclid(16) as usize]
        }
        _ => NO_DIRECTION,
    }
}

/// Distance in whole kilometres.
pub fn distance_km(value: Option<f64>, unit: DistanceUnit) -> Option<u32> {
    value.map(|v| {
        let km = match unit {
            DistanceUnit::Meters => v / 1000.0,
            DistanceUnit::Kilometers => v,
        };
        km.round() as u32
    })
}

/// Round a temperature (or any signed reading) to the nearest whole number.
pub fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_label_known_points() {
        assert_eq!(compass_label(Some(0.0)), "N");
        assert_eq!(compass_label(Some(360.0)), "N");
        assert_eq!(compass_label(Some(202.0)), "SSW");
        assert_eq!(compass_label(Some(90.0)), "E");
        assert_eq!(compass_label(Some(348.0)), "NNW");
        assert_eq!(compass_label(Some(349.0)), "N");
    }

    #[test]
    fn compass_label_always_one_of_sixteen() {
        for deg in 0..=360 {
            let label = compass_label(Some(deg as f64));
            assert!(COMPASS_POINTS.contains(&label), "{deg} -> {label}");
        }
    }

    #[test]
    fn compass_label_missing_or_invalid_is_sentinel() {
        assert_eq!(compass_label(None), NO_DIRECTION);
        assert_eq!(compass_label(Some(f64::NAN)), NO_DIRECTION);
        assert!(!COMPASS_POINTS.contains(&NO_DIRECTION));
    }

    #[test]
    fn compass_label_wraps_negative_degrees() {
        assert_eq!(compass_label(Some(-90.0)), "W");
    }

    #[test]
    fn wind_speed_conversion() {
        assert_eq!(wind_speed_kmh(10.0, SpeedUnit::MetersPerSecond), 36);
        assert_eq!(wind_speed_kmh(4.1, SpeedUnit::MetersPerSecond), 15);
        assert_eq!(wind_speed_kmh(14.4, SpeedUnit::KilometersPerHour), 14);
        assert_eq!(wind_speed_kmh(0.0, SpeedUnit::MetersPerSecond), 0);
    }

    #[test]
    fn wind_speed_is_monotonic() {
        let mut last = 0;
        for step in 0..400 {
            let kmh = wind_speed_kmh(step as f64 * 0.1, SpeedUnit::MetersPerSecond);
            assert!(kmh >= last);
            last = kmh;
        }
    }

    #[test]
    fn distance_conversion() {
        assert_eq!(distance_km(Some(10_000.0), DistanceUnit::Meters), Some(10));
        assert_eq!(distance_km(Some(9_600.0), DistanceUnit::Meters), Some(10));
        assert_eq!(distance_km(Some(6.4), DistanceUnit::Kilometers), Some(6));
        assert_eq!(distance_km(None, DistanceUnit::Meters), None);
    }

    #[test]
    fn temperature_rounding() {
        assert_eq!(round_to_i32(21.5), 22);
        assert_eq!(round_to_i32(-3.6), -4);
    }
}
