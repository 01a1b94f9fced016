//! Groups normalized observations by calendar date and reduces each group
//! into a [`DailySummary`].

use std::collections::HashMap;

use crate::model::{Coordinates, DailySummary, ForecastResult, NormalizedObservation};

/// Date part of a display datetime: everything before the first space or `T`.
pub fn date_key(date_time: &str) -> &str {
    date_time
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or(date_time)
}

/// Partition `observations` by date and summarize each day.
///
/// Days come out in the order their first observation appears; within a day
/// observations keep their input order. An empty input gives no days.
pub fn summarize_days(observations: &[NormalizedObservation]) -> Vec<DailySummary> {
    let mut groups: Vec<(&str, Vec<&NormalizedObservation>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for obs in observations {
        let key = date_key(&obs.date_time);
        match index.get(key).copied() {
            Some(i) => groups[i].1.push(obs),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![obs]));
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|(date, members)| summarize_day(date, &members))
        .collect()
}

/// Reduce one day. Returns `None` only for an empty group.
fn summarize_day(date: &str, members: &[&NormalizedObservation]) -> Option<DailySummary> {
    let temp_min = members.iter().map(|o| o.temperature).min()?;
    let temp_max = members.iter().map(|o| o.temperature).max()?;
    let max_wind_speed = members.iter().map(|o| o.wind_speed).max()?;
    let max_wind_gust = members.iter().filter_map(|o| o.wind_gust).max();

    let humidity_sum: u32 = members.iter().map(|o| u32::from(o.humidity)).sum();
    let avg_humidity = (f64::from(humidity_sum) / members.len() as f64).round() as u8;

    Some(DailySummary {
        date: date.to_string(),
        temp_min,
        temp_max,
        avg_humidity,
        max_wind_speed,
        max_wind_gust,
        dominant_description: dominant_description(members),
        hourly_data: members.iter().map(|&o| o.clone()).collect(),
    })
}

/// Most frequent description of the day. On a tie, the description that
/// showed up first wins.
fn dominant_description(members: &[&NormalizedObservation]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for obs in members {
        match counts.iter_mut().find(|(desc, _)| *desc == obs.description) {
            Some((_, count)) => *count += 1,
            None => counts.push((obs.description.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (desc, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((desc, count));
        }
    }

    best.map(|(desc, _)| desc.to_string()).unwrap_or_default()
}

/// Assemble the full forecast payload from already-normalized observations.
pub fn build_forecast(
    location: String,
    coordinates: Coordinates,
    timezone: String,
    observations: Vec<NormalizedObservation>,
) -> ForecastResult {
    let daily_summary = summarize_days(&observations);

    ForecastResult {
        location,
        coordinates,
        timezone,
        total_hours: observations.len(),
        total_days: daily_summary.len(),
        hourly_forecast: observations,
        daily_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date_time: &str, temperature: i32) -> NormalizedObservation {
        NormalizedObservation {
            date_time: date_time.to_string(),
            timestamp: 0,
            temperature,
            feels_like: temperature,
            humidity: 50,
            pressure: 1013,
            wind_speed: 10,
            wind_direction: "N".into(),
            wind_degrees: 0.0,
            wind_gust: None,
            visibility: Some(10),
            cloudiness: 0,
            precipitation: 0.0,
            description: "clear sky".into(),
            icon: String::new(),
        }
    }

    #[test]
    fn date_key_splits_on_space_or_t() {
        assert_eq!(date_key("2024-01-15 12:00:00"), "2024-01-15");
        assert_eq!(date_key("2024-01-15T12:00"), "2024-01-15");
        assert_eq!(date_key("2024-01-15"), "2024-01-15");
    }

    #[test]
    fn two_days_two_observations_each() {
        let input = vec![
            obs("2024-01-15 09:00:00", 10),
            obs("2024-01-15 15:00:00", 20),
            obs("2024-01-16 09:00:00", 5),
            obs("2024-01-16 15:00:00", 15),
        ];

        let days = summarize_days(&input);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-15");
        assert_eq!((days[0].temp_min, days[0].temp_max), (10, 20));
        assert_eq!(days[1].date, "2024-01-16");
        assert_eq!((days[1].temp_min, days[1].temp_max), (5, 15));
    }

    #[test]
    fn grouping_partitions_input_in_order() {
        let input = vec![
            obs("2024-01-15 21:00:00", 3),
            obs("2024-01-16 00:00:00", 2),
            obs("2024-01-16 03:00:00", 1),
            obs("2024-01-17 00:00:00", 0),
            obs("2024-01-17 03:00:00", -1),
        ];

        let days = summarize_days(&input);
        let flattened: Vec<_> = days.iter().flat_map(|d| d.hourly_data.iter().cloned()).collect();
        assert_eq!(flattened, input);

        for day in &days {
            for member in &day.hourly_data {
                assert_eq!(date_key(&member.date_time), day.date);
                assert!(day.temp_min <= member.temperature);
                assert!(member.temperature <= day.temp_max);
            }
        }
    }

    #[test]
    fn day_order_follows_first_appearance() {
        let input = vec![
            obs("2024-01-16 00:00:00", 1),
            obs("2024-01-15 00:00:00", 2),
            obs("2024-01-16 03:00:00", 3),
        ];

        let days = summarize_days(&input);
        assert_eq!(days[0].date, "2024-01-16");
        assert_eq!(days[0].hourly_data.len(), 2);
        assert_eq!(days[1].date, "2024-01-15");
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(summarize_days(&[]).is_empty());
    }

    #[test]
    fn max_gust_only_over_reporting_members() {
        let mut calm = obs("2024-01-15 00:00:00", 1);
        calm.wind_speed = 30;
        let mut gusty = obs("2024-01-15 03:00:00", 1);
        gusty.wind_gust = Some(0);
        let quiet = obs("2024-01-16 00:00:00", 1);

        let days = summarize_days(&[calm, gusty, quiet]);
        assert_eq!(days[0].max_wind_gust, Some(0));
        assert_eq!(days[0].max_wind_speed, 30);
        assert_eq!(days[1].max_wind_gust, None);
    }

    #[test]
    fn average_humidity_is_rounded() {
        let mut a = obs("2024-01-15 00:00:00", 1);
        a.humidity = 60;
        let mut b = obs("2024-01-15 03:00:00", 1);
        b.humidity = 65;

        let days = summarize_days(&[a, b]);
        assert_eq!(days[0].avg_humidity, 63);
    }

    #[test]
    fn dominant_description_highest_count_wins() {
        let descriptions = ["rain", "clouds", "rain", "clear sky"];
        let input: Vec<_> = descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut o = obs(&format!("2024-01-15 {:02}:00:00", i * 3), 1);
                o.description = d.to_string();
                o
            })
            .collect();

        assert_eq!(summarize_days(&input)[0].dominant_description, "rain");
    }

    #[test]
    fn dominant_description_tie_goes_to_first_seen() {
        let descriptions = ["clouds", "rain", "rain", "clouds"];
        let input: Vec<_> = descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut o = obs(&format!("2024-01-15 {:02}:00:00", i * 3), 1);
                o.description = d.to_string();
                o
            })
            .collect();

        assert_eq!(summarize_days(&input)[0].dominant_description, "clouds");
    }

    #[test]
    fn build_forecast_counts() {
        let input = vec![
            obs("2024-01-15 09:00:00", 10),
            obs("2024-01-15 15:00:00", 20),
            obs("2024-01-16 09:00:00", 5),
        ];

        let forecast = build_forecast(
            "Madrid, ES".into(),
            Coordinates { lat: 40.4, lon: -3.7 },
            "UTC+01:00".into(),
            input,
        );

        assert_eq!(forecast.total_hours, 3);
        assert_eq!(forecast.total_days, 2);
        assert_eq!(forecast.hourly_forecast.len(), 3);

        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["totalDays"], 2);
        assert_eq!(json["dailySummary"][0]["tempMax"], 20);
        assert!(json["dailySummary"][1]["maxWindGust"].is_null());
    }
}
