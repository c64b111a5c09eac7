use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::provider::ProviderId;

pub const DEFAULT_LATITUDE: f64 = 59.3110;
pub const DEFAULT_LONGITUDE: f64 = 18.0300;
pub const DEFAULT_USER_AGENT: &str = concat!(
    "best-weather/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/norrland/best-weather)"
);

/// Optional full-URL overrides, one per provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub smhi: Option<String>,
    pub met_norway: Option<String>,
    pub open_meteo: Option<String>,
}

/// Top-level configuration. Every field has a default, so a missing file or
/// an empty one gives the stock Stockholm setup.
///
/// Example TOML:
/// ```toml
/// latitude = 59.3110
/// longitude = 18.0300
///
/// [endpoints]
/// open_meteo = "http://localhost:9000/v1/forecast"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub latitude: f64,
    pub longitude: f64,
    /// Sent on every request; MET Norway rejects anonymous clients.
    pub user_agent: String,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// URL the given provider is fetched from.
    pub fn endpoint(&self, id: ProviderId) -> String {
        let configured = match id {
            ProviderId::Smhi => &self.endpoints.smhi,
            ProviderId::MetNorway => &self.endpoints.met_norway,
            ProviderId::OpenMeteo => &self.endpoints.open_meteo,
        };

        configured.clone().unwrap_or_else(|| self.default_endpoint(id))
    }

    fn default_endpoint(&self, id: ProviderId) -> String {
        let (lat, lon) = (self.latitude, self.longitude);
        match id {
            ProviderId::Smhi => format!(
                "https://opendata-download-metfcst.smhi.se/api/category/pmp3g/version/2/geotype/point/lon/{lon:.4}/lat/{lat:.4}/data.json"
            ),
            ProviderId::MetNorway => format!(
                "https://api.met.no/weatherapi/locationforecast/2.0/compact?lat={lat:.4}&lon={lon:.4}"
            ),
            ProviderId::OpenMeteo => format!(
                "https://api.open-meteo.com/v1/forecast?latitude={lat:.4}&longitude={lon:.4}&hourly=temperature_2m,relative_humidity_2m&forecast_days=3"
            ),
        }
    }

    /// Load config from the platform config directory, or return defaults if
    /// it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(anyhow!("latitude {} is outside -90..=90", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(anyhow!("longitude {} is outside -180..=180", self.longitude));
        }
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("se", "norrland", "best-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
