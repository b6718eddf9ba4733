use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "configuration file not found. Expecting: '{}' or a custom file from env variable '{env_var}'",
        .path.display()
    )]
    FileMissing { path: PathBuf, env_var: &'static str },

    #[error("failed to read configuration file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required configuration key '{section}.{key}'")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },
}

/// Failures while fetching current weather.
///
/// `Auth` is fatal; the other variants are propagated so the caller can log
/// them and terminate the run instead of mis-parsing an error body as JSON.
#[derive(Debug, Error)]
pub enum WeatherFetchError {
    #[error("permission denied by the weather service (HTTP 401). Check your api_token")]
    Auth,

    #[error("weather request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to reach the weather service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse the weather service response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while synthesizing or playing the announcement.
///
/// Only `UnsupportedLanguage` escapes [`crate::speech::Announcer::announce`];
/// the remaining variants are logged there and reported as `Ok(false)`.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("language not supported by the speech engine: '{0}'")]
    UnsupportedLanguage(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("audio playback failed: {0}")]
    Playback(String),

    #[error("audio file error: {0}")]
    Io(#[from] std::io::Error),
}
