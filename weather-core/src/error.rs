use thiserror::Error;

/// Failures a provider call can end in.
///
/// The HTTP layer only needs to tell "the location does not exist" apart from
/// everything else, see [`WeatherError::is_not_found`].
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The upstream provider could not resolve the requested location.
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// Latitude or longitude outside of the valid range.
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// The upstream answered with a non-success status we don't map specifically.
    #[error("Upstream request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The request never produced a response.
    #[error("Failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream body was not the JSON we expected.
    #[error("Failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl WeatherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::LocationNotFound { .. })
    }
}

pub type WeatherResult<T> = Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_location_not_found_is_not_found() {
        let missing = WeatherError::LocationNotFound { query: "Atlantis".into() };
        assert!(missing.is_not_found());

        let upstream = WeatherError::Upstream { status: 401, body: "bad key".into() };
        assert!(!upstream.is_not_found());
        assert!(!WeatherError::InvalidCoordinates.is_not_found());
    }

    #[test]
    fn upstream_message_carries_status() {
        let err = WeatherError::Upstream { status: 503, body: "down".into() };
        assert_eq!(err.to_string(), "Upstream request failed with status 503: down");
    }
}
