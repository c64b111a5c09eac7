//! Errors a caller of [`crate::BestWeatherService`] can observe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BestWeatherError {
    /// Every provider came back without a usable reading.
    #[error("No weather data available")]
    NoWeatherData,

    /// A provider failed in a way it did not handle itself. The cause is
    /// logged, not carried.
    #[error("Failed to retrieve weather data from one or more clients")]
    WeatherClient,
}

impl BestWeatherError {
    /// HTTP status an outer service boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoWeatherData => 404,
            Self::WeatherClient => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(BestWeatherError::NoWeatherData.status_code(), 404);
        assert_eq!(BestWeatherError::WeatherClient.status_code(), 503);
    }

    #[test]
    fn messages_do_not_leak_causes() {
        assert_eq!(BestWeatherError::NoWeatherData.to_string(), "No weather data available");
        assert_eq!(
            BestWeatherError::WeatherClient.to_string(),
            "Failed to retrieve weather data from one or more clients"
        );
    }
}
