//! Core library for `best-weather`.
//!
//! This crate defines:
//! - One fetcher per forecast provider (SMHI, MET Norway, Open-Meteo), each
//!   reducing its own payload to a single reading about 24 hours ahead
//! - The aggregation that picks the warmest of those readings
//! - Configuration of the fixed location and endpoints
//!
//! It is used by `best-weather-cli`, but can also be embedded in other services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use config::Config;
pub use error::BestWeatherError;
pub use model::Reading;
pub use provider::{ProviderId, WeatherProvider};
pub use service::BestWeatherService;
