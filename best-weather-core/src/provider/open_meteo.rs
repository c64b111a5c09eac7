use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::Reading;

use super::{
    ProviderId, WeatherProvider, get_json,
    matching::{candidates, first_at_or_after, parse_naive_utc},
};

/// Open-Meteo hourly forecast. The grid is strictly ascending and hourly, so
/// the first hour at or after the target is taken.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    url: String,
}

impl OpenMeteoProvider {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[derive(Debug, Deserialize)]
struct MeteoResponse {
    hourly: Option<MeteoHourly>,
}

#[derive(Debug, Deserialize)]
struct MeteoHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
}

struct HourlyRow<'a> {
    time: &'a str,
    temperature: Option<f64>,
    humidity: Option<f64>,
}

fn select(response: &MeteoResponse, target: DateTime<Utc>) -> Option<Reading> {
    let id = ProviderId::OpenMeteo;

    let Some(hourly) = response
        .hourly
        .as_ref()
        .filter(|h| !h.time.is_empty() && !h.temperature_2m.is_empty() && !h.relative_humidity_2m.is_empty())
    else {
        tracing::warn!(provider = %id, "No hourly weather data available");
        return None;
    };

    let lengths = [hourly.time.len(), hourly.temperature_2m.len(), hourly.relative_humidity_2m.len()];
    if lengths.iter().any(|len| *len != lengths[0]) {
        tracing::warn!(provider = %id, ?lengths, "Hourly arrays differ in length, using the shortest");
    }

    let rows = hourly
        .time
        .iter()
        .zip(&hourly.temperature_2m)
        .zip(&hourly.relative_humidity_2m)
        .map(|((time, temperature), humidity)| HourlyRow {
            time: time.as_str(),
            temperature: *temperature,
            humidity: *humidity,
        });

    let Some(hour) = first_at_or_after(candidates(id, rows, |r| r.time, parse_naive_utc), target)
    else {
        tracing::warn!(provider = %id, "No measurement found at or after 24 hours from now");
        return None;
    };

    let (Some(temperature), Some(humidity)) = (hour.entry.temperature, hour.entry.humidity) else {
        tracing::warn!(
            provider = %id,
            time = %hour.time,
            "Selected hour is missing temperature or humidity"
        );
        return None;
    };

    Some(Reading {
        temperature,
        humidity,
        timestamp: hour.time,
        origin: id,
    })
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn fetch(&self, target: DateTime<Utc>) -> anyhow::Result<Option<Reading>> {
        tracing::info!(provider = %self.id(), "Fetching weather data");

        let response: MeteoResponse = match get_json(&self.http, &self.url, self.id()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(provider = %self.id(), "Failed to retrieve weather data: {e:#}");
                return Ok(None);
            }
        };

        let reading = select(&response, target);
        if let Some(reading) = &reading {
            tracing::info!(provider = %self.id(), %reading, "Weather data retrieved");
        }

        Ok(reading)
    }
}
