use std::panic::AssertUnwindSafe;

use chrono::{DateTime, Utc};
use futures::{FutureExt, future::join_all};

use crate::{
    Config,
    error::BestWeatherError,
    model::Reading,
    provider::{WeatherProvider, all_providers_from_config, matching::target_time},
};

/// Asks every provider for a forecast about a day ahead and keeps the warmest.
#[derive(Debug)]
pub struct BestWeatherService {
    providers: Vec<Box<dyn WeatherProvider>>,
}

impl BestWeatherService {
    /// Providers are asked in the given order, which also breaks temperature ties.
    pub fn new(providers: Vec<Box<dyn WeatherProvider>>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(all_providers_from_config(config)?))
    }

    pub async fn get_best_weather(&self) -> Result<Reading, BestWeatherError> {
        self.get_best_weather_at(Utc::now()).await
    }

    pub async fn get_best_weather_at(&self, now: DateTime<Utc>) -> Result<Reading, BestWeatherError> {
        let target = target_time(now);
        tracing::debug!(%target, providers = self.providers.len(), "Fetching forecasts");

        let results = join_all(
            self.providers
                .iter()
                .map(|p| AssertUnwindSafe(p.fetch(target)).catch_unwind()),
        )
        .await;

        let mut readings = Vec::with_capacity(results.len());
        for (provider, result) in self.providers.iter().zip(results) {
            match result {
                Ok(Ok(Some(reading))) => readings.push(reading),
                Ok(Ok(None)) => tracing::debug!(provider = %provider.id(), "No data"),
                Ok(Err(e)) => {
                    tracing::error!(provider = %provider.id(), "Error retrieving weather data: {e:#}");
                    return Err(BestWeatherError::WeatherClient);
                }
                Err(_) => {
                    tracing::error!(provider = %provider.id(), "Provider panicked while fetching");
                    return Err(BestWeatherError::WeatherClient);
                }
            }
        }

        let Some(best) = select_best(readings) else {
            tracing::error!("No weather data available");
            return Err(BestWeatherError::NoWeatherData);
        };

        tracing::info!(%best, "Best weather data retrieved");
        Ok(best)
    }
}

/// The reading with the strictly greatest temperature; the earliest one wins a tie.
pub fn select_best(readings: impl IntoIterator<Item = Reading>) -> Option<Reading> {
    let mut best: Option<Reading> = None;

    for reading in readings {
        if reading.temperature.is_nan() {
            tracing::warn!(origin = %reading.origin, "Ignoring reading without a temperature");
            continue;
        }
        if best.as_ref().is_none_or(|b| reading.temperature > b.temperature) {
            best = Some(reading);
        }
    }

    best
}
