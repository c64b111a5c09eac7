use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::Reading;

use super::{
    ProviderId, WeatherProvider, get_json,
    matching::{candidates, nearest_by_abs_difference, parse_rfc3339},
};

/// SMHI point forecast (`pmp3g`). Irregularly spaced, so the entry nearest to
/// the target in either direction is used.
#[derive(Debug, Clone)]
pub struct SmhiProvider {
    http: Client,
    url: String,
}

impl SmhiProvider {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmhiResponse {
    #[serde(default)]
    time_series: Vec<SmhiTimeSeries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmhiTimeSeries {
    valid_time: String,
    #[serde(default)]
    parameters: Vec<SmhiParameter>,
}

#[derive(Debug, Deserialize)]
struct SmhiParameter {
    name: String,
    #[serde(default)]
    values: Vec<f64>,
}

impl SmhiTimeSeries {
    fn value(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.values.first().copied())
    }
}

fn select(response: &SmhiResponse, target: DateTime<Utc>) -> Option<Reading> {
    let id = ProviderId::Smhi;
    let series = candidates(id, &response.time_series, |t| t.valid_time.as_str(), parse_rfc3339);

    let Some(closest) = nearest_by_abs_difference(series, target) else {
        tracing::warn!(provider = %id, "No measurement found close to 24 hours from now");
        return None;
    };

    let (Some(temperature), Some(humidity)) = (closest.entry.value("t"), closest.entry.value("r"))
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
impl WeatherProvider for SmhiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Smhi
    }

    async fn fetch(&self, target: DateTime<Utc>) -> anyhow::Result<Option<Reading>> {
        tracing::info!(provider = %self.id(), "Fetching weather data");

        let response: SmhiResponse = match get_json(&self.http, &self.url, self.id()).await {
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
