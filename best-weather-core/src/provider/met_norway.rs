use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::Reading;

use super::{
    ProviderId, WeatherProvider, get_json,
    matching::{candidates, nearest_by_abs_difference, parse_rfc3339},
};

/// MET Norway `locationforecast/2.0/compact`.
///
/// The feed switches from hourly to 6-hourly steps a few days out, so the
/// nearest entry in either direction is used.
#[derive(Debug, Clone)]
pub struct MetNorwayProvider {
    http: Client,
    url: String,
}

impl MetNorwayProvider {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[derive(Debug, Deserialize)]
struct MetResponse {
    properties: Option<MetProperties>,
}

#[derive(Debug, Deserialize)]
struct MetProperties {
    #[serde(default)]
    timeseries: Vec<MetTimeseries>,
}

#[derive(Debug, Deserialize)]
struct MetTimeseries {
    time: String,
    data: MetData,
}

#[derive(Debug, Deserialize)]
struct MetData {
    instant: MetInstant,
}

#[derive(Debug, Deserialize)]
struct MetInstant {
    details: MetDetails,
}

#[derive(Debug, Deserialize)]
struct MetDetails {
    air_temperature: Option<f64>,
    relative_humidity: Option<f64>,
}

fn select(response: &MetResponse, target: DateTime<Utc>) -> Option<Reading> {
    let id = ProviderId::MetNorway;
    let timeseries = response
        .properties
        .as_ref()
        .map(|p| p.timeseries.as_slice())
        .unwrap_or_default();

    let series = candidates(id, timeseries, |t| t.time.as_str(), parse_rfc3339);

    let Some(closest) = nearest_by_abs_difference(series, target) else {
        tracing::warn!(provider = %id, "No measurement found close to 24 hours from now");
        return None;
    };

    let details = &closest.entry.data.instant.details;
    let (Some(temperature), Some(humidity)) = (details.air_temperature, details.relative_humidity)
    else {
        tracing::warn!(
            provider = %id,
            time = %closest.time,
            "Closest measurement is missing temperature or humidity"
        );
        return None;
    };

    Some(Reading {
        temperature,
        humidity,
        timestamp: closest.time,
        origin: id,
    })
}

#[async_trait]
impl WeatherProvider for MetNorwayProvider {
    fn id(&self) -> ProviderId {
        ProviderId::MetNorway
    }

    async fn fetch(&self, target: DateTime<Utc>) -> anyhow::Result<Option<Reading>> {
        tracing::info!(provider = %self.id(), "Fetching weather data");

        let response: MetResponse = match get_json(&self.http, &self.url, self.id()).await {
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
