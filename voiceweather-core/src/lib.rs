//! Core library for the `voiceweather` CLI.
//!
//! This crate defines:
//! - Configuration handling (application and logging config files)
//! - Geolocation and weather clients
//! - Localized phrase templates
//! - The speech announcer (synthesis + external playback)
//!
//! It is used by `voiceweather-cli`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod phrase;
pub mod speech;
pub mod weather;

pub use config::{AppConfig, LogConfig};
pub use error::{ConfigError, SpeechError, WeatherFetchError};
pub use geo::GeoClient;
pub use model::{GeolocationInfo, WeatherReport};
pub use speech::Announcer;
pub use weather::WeatherClient;
