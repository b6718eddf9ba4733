use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voiceweather_core::{Announcer, AppConfig, GeoClient, LogConfig, WeatherClient};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "voiceweather",
    version,
    about = "Speaks the current weather for your approximate location"
)]
pub struct Cli {
    /// Application config path; overrides the WEATHER_APP_CONFIG env variable.
    #[arg(long)]
    pub app_config: Option<PathBuf>,

    /// Logging config path; overrides the WEATHER_LOG_CONFIG env variable.
    #[arg(long)]
    pub log_config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> ExitCode {
        let log_config = match LogConfig::load(self.log_config.clone()) {
            Ok(cfg) => cfg,
            Err(err) => {
                // Logging is not up yet, so the diagnostic goes to stderr.
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        };

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(log_config.filter))
            .init();

        match self.execute().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                tracing::error!("{err:#}");
                ExitCode::FAILURE
            }
        }
    }

    async fn execute(self) -> anyhow::Result<()> {
        tracing::info!("Setting application configuration");
        let config = AppConfig::load(self.app_config)?;

        // Recorded for the run log; nothing downstream reads it.
        let started = chrono::Local::now();
        tracing::debug!("Run started at {}", started.format("%Y-%m-%d %I:%M %p"));

        let location = GeoClient::new().resolve_location().await?;
        tracing::debug!(
            city = %location.city,
            region = %location.region_name,
            country = %location.country_name,
            "Resolved location"
        );

        let weather = WeatherClient::new(config.weather_api.api_token)
            .fetch_weather(&location)
            .await?;

        let announcer = Announcer::new(config.voice.player);
        let spoken = announcer
            .speak_weather(&weather, &config.voice.language)
            .await?;

        if !spoken {
            tracing::warn!("The announcement could not be spoken");
        }

        Ok(())
    }
}
