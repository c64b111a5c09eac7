use std::{net::SocketAddr, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context;
use best_weather_core::{BestWeatherError, BestWeatherService, Config, Reading};
use clap::{Parser, Subcommand};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "best-weather",
    version,
    about = "Warmest forecast for tomorrow across SMHI, MET Norway and Open-Meteo"
)]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch all providers once and print the warmest reading.
    Show {
        /// Print the reading as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Serve `GET /best-weather` over HTTP.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let service = BestWeatherService::from_config(&config)?;

        match self.command {
            Command::Show { json } => match service.get_best_weather().await {
                Ok(reading) => {
                    println!("{}", render(&reading, json)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(ExitCode::from(exit_status(&e)))
                }
            },
            Command::Serve { addr } => {
                server::serve(Arc::new(service), addr).await;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn render(reading: &Reading, json: bool) -> anyhow::Result<String> {
    if json {
        return serde_json::to_string_pretty(reading).context("Failed to serialize reading");
    }

    let local = reading.timestamp.with_timezone(&chrono::Local);
    Ok(format!(
        "Warmest forecast: {:.1}°C ({:.0}% humidity) from {}, valid {}",
        reading.temperature,
        reading.humidity,
        reading.origin,
        local.format("%Y-%m-%d %H:%M %Z"),
    ))
}

/// Distinct non-zero codes so scripts can tell "no data" from "providers down".
fn exit_status(err: &BestWeatherError) -> u8 {
    match err {
        BestWeatherError::NoWeatherData => 4,
        BestWeatherError::WeatherClient => 3,
    }
}
