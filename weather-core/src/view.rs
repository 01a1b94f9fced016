//! Presentation state for browsing a forecast: which day is selected, which
//! hours are visible, and whether a fetch is in flight.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, Timelike};
use std::str::FromStr;

use crate::model::{DailySummary, ForecastResult, NormalizedObservation};

/// Loading flag for whatever is being displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Inclusive hour-of-day window, e.g. `06-18`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub from: u32,
    pub to: u32,
}

impl HourRange {
    pub fn new(from: u32, to: u32) -> Result<Self> {
        if from > 23 || to > 23 {
            bail!("Hours must be between 0 and 23 (got {from}-{to})");
        }
        if from > to {
            bail!("Hour range start {from} is after its end {to}");
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.from..=self.to).contains(&hour)
    }
}

impl FromStr for HourRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (from, to) = s
            .split_once('-')
            .with_context(|| format!("Expected an hour range like 06-18, got '{s}'"))?;

        let from = from.trim().parse().with_context(|| format!("Invalid start hour '{from}'"))?;
        let to = to.trim().parse().with_context(|| format!("Invalid end hour '{to}'"))?;

        HourRange::new(from, to)
    }
}

/// A loaded forecast plus the user's current selection.
///
/// `selected_day` always indexes into `forecast.daily_summary` when the
/// forecast has any day at all.
#[derive(Debug, Clone)]
pub struct ForecastView {
    forecast: ForecastResult,
    selected_day: usize,
    hour_filter: Option<HourRange>,
}

impl ForecastView {
    pub fn new(forecast: ForecastResult) -> Self {
        Self { forecast, selected_day: 0, hour_filter: None }
    }

    pub fn forecast(&self) -> &ForecastResult {
        &self.forecast
    }

    pub fn days(&self) -> &[DailySummary] {
        &self.forecast.daily_summary
    }

    pub fn selected_index(&self) -> usize {
        self.selected_day
    }

    pub fn select_day(&mut self, index: usize) -> Result<()> {
        let total = self.days().len();
        if index >= total {
            bail!("Day {} is out of range: forecast has {total} day(s)", index + 1);
        }
        self.selected_day = index;
        Ok(())
    }

    pub fn set_hour_filter(&mut self, filter: Option<HourRange>) {
        self.hour_filter = filter;
    }

    pub fn hour_filter(&self) -> Option<HourRange> {
        self.hour_filter
    }

    pub fn selected(&self) -> Option<&DailySummary> {
        self.days().get(self.selected_day)
    }

    /// Observations of the selected day that pass the hour filter.
    ///
    /// Entries whose display time can't be parsed are kept.
    pub fn visible_hours(&self) -> Vec<&NormalizedObservation> {
        let Some(day) = self.selected() else {
            return Vec::new();
        };

        day.hourly_data
            .iter()
            .filter(|obs| match (self.hour_filter, hour_of(&obs.date_time)) {
                (Some(range), Some(hour)) => range.contains(hour),
                _ => true,
            })
            .collect()
    }
}

/// Everything a forecast screen shows: the loading flag and, once loaded,
/// the forecast with its selection.
#[derive(Debug, Clone, Default)]
pub struct ForecastScreen {
    status: ViewStatus,
    view: Option<ForecastView>,
}

impl ForecastScreen {
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ViewStatus::Loading
    }

    pub fn view(&self) -> Option<&ForecastView> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut ForecastView> {
        self.view.as_mut()
    }

    pub fn begin_loading(&mut self) {
        self.status = ViewStatus::Loading;
    }

    pub fn loaded(&mut self, forecast: ForecastResult) {
        self.view = Some(ForecastView::new(forecast));
        self.status = ViewStatus::Ready;
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        self.view = None;
        self.status = ViewStatus::Failed(message.into());
    }
}

fn hour_of(date_time: &str) -> Option<u32> {
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date_time, fmt).ok())
        .map(|dt| dt.hour())
}
