//! Application state shared across handlers

use std::{fmt, sync::Arc};

use weather_core::WeatherProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The provider selected at startup
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").field("provider", &self.provider.id()).finish()
    }
}
