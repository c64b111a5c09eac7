use crate::{
    Config, Reading,
    provider::{met_norway::MetNorwayProvider, open_meteo::OpenMeteoProvider, smhi::SmhiProvider},
};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;

pub mod matching;
pub mod met_norway;
pub mod open_meteo;
pub mod smhi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "Smhi")]
    Smhi,
    #[serde(rename = "Met Norway")]
    MetNorway,
    #[serde(rename = "Meteo")]
    OpenMeteo,
}

impl ProviderId {
    /// Origin label reported on readings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Smhi => "Smhi",
            ProviderId::MetNorway => "Met Norway",
            ProviderId::OpenMeteo => "Meteo",
        }
    }

    /// All providers, in fetch order.
    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Smhi, ProviderId::MetNorway, ProviderId::OpenMeteo]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A forecast source that can produce one reading near a target time.
///
/// `Ok(None)` means the provider had nothing usable (transport failure, bad
/// payload, no matching entry). `Err` is kept for failures the provider did
/// not anticipate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn fetch(&self, target: DateTime<Utc>) -> anyhow::Result<Option<Reading>>;
}

/// Construct one provider from config.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let http = http_client(config)?;
    let url = config.endpoint(id);

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::Smhi => Box::new(SmhiProvider::new(http, url)),
        ProviderId::MetNorway => Box::new(MetNorwayProvider::new(http, url)),
        ProviderId::OpenMeteo => Box::new(OpenMeteoProvider::new(http, url)),
    };

    Ok(boxed)
}

/// Construct every provider from config, in fetch order.
pub fn all_providers_from_config(config: &Config) -> anyhow::Result<Vec<Box<dyn WeatherProvider>>> {
    ProviderId::all()
        .iter()
        .map(|id| provider_from_config(*id, config))
        .collect()
}

fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url` and decode the body as JSON, failing on non-success statuses.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    id: ProviderId,
) -> anyhow::Result<T> {
    let res = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {id}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {id} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{id} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {id} JSON"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
