use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::ConfigError;

/// Env variable overriding the application config path.
pub const APP_CONFIG_ENV: &str = "WEATHER_APP_CONFIG";
/// Env variable overriding the logging config path.
pub const LOG_CONFIG_ENV: &str = "WEATHER_LOG_CONFIG";

/// Default application config location, relative to the working directory.
pub const DEFAULT_APP_CONFIG_PATH: &str = "conf/app_config.toml";
/// Default logging config location, relative to the working directory.
pub const DEFAULT_LOG_CONFIG_PATH: &str = "conf/log_config.toml";

/// `[weather_api]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherApiConfig {
    /// API token passed to the weather service as a query parameter.
    #[serde(default)]
    pub api_token: String,
}

/// `[voice]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// BCP-47-like language tag, e.g. "en" or "pt-br".
    #[serde(default)]
    pub language: String,

    /// External audio player command. The synthesized clip path is passed
    /// as its last argument.
    #[serde(default = "default_player")]
    pub player: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: String::new(),
            player: default_player(),
        }
    }
}

fn default_player() -> String {
    "mpg123 -q".to_string()
}

/// Application configuration, read once at startup and immutable afterwards.
///
/// Example TOML:
///
/// ```toml
/// [weather_api]
/// api_token = "..."
///
/// [voice]
/// language = "pt-br"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub weather_api: WeatherApiConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl AppConfig {
    /// Load the application config, resolving the path from an explicit
    /// override, the `WEATHER_APP_CONFIG` env variable, or the default
    /// location, in that order.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = resolve_config_path(path_override, APP_CONFIG_ENV, DEFAULT_APP_CONFIG_PATH);
        let contents = read_config_file(&path, APP_CONFIG_ENV)?;
        let cfg = Self::from_toml(&contents, &path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg = Self::from_toml(contents, Path::new("<inline>"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.weather_api.api_token.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "weather_api",
                key: "api_token",
            });
        }
        if self.voice.language.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "voice",
                key: "language",
            });
        }
        Ok(())
    }
}

/// Logging configuration: a single `tracing` filter directive.
///
/// Example TOML:
///
/// ```toml
/// filter = "info,voiceweather_core=debug"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl LogConfig {
    /// Load the logging config; same path resolution rules as [`AppConfig`].
    pub fn load(path_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = resolve_config_path(path_override, LOG_CONFIG_ENV, DEFAULT_LOG_CONFIG_PATH);
        let contents = read_config_file(&path, LOG_CONFIG_ENV)?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }
}

/// Resolve a config file path: explicit override, then env variable, then
/// the default location.
pub fn resolve_config_path(
    path_override: Option<PathBuf>,
    env_var: &'static str,
    default_path: &str,
) -> PathBuf {
    path_override
        .or_else(|| env::var_os(env_var).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default_path))
}

fn read_config_file(path: &Path, env_var: &'static str) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileMissing {
            path: path.to_path_buf(),
            env_var,
        });
    }

    fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn full_config_parses() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [weather_api]
            api_token = "TOKEN"

            [voice]
            language = "pt-br"
            player = "afplay"
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.weather_api.api_token, "TOKEN");
        assert_eq!(cfg.voice.language, "pt-br");
        assert_eq!(cfg.voice.player, "afplay");
    }

    #[test]
    fn player_defaults_to_mpg123() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [weather_api]
            api_token = "TOKEN"

            [voice]
            language = "en"
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.voice.player, "mpg123 -q");
    }

    #[test]
    fn missing_api_token_is_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [voice]
            language = "en"
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::MissingKey { section, key } => {
                assert_eq!(section, "weather_api");
                assert_eq!(key, "api_token");
            }
            other => panic!("expected MissingKey, got: {other}"),
        }
    }

    #[test]
    fn empty_language_is_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [weather_api]
            api_token = "TOKEN"

            [voice]
            language = ""
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("voice.language"));
    }

    #[test]
    fn missing_file_names_path_and_env_var() {
        let err = AppConfig::load(Some(PathBuf::from("/nonexistent/app_config.toml"))).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/app_config.toml"));
        assert!(msg.contains(APP_CONFIG_ENV));
    }

    #[test]
    fn load_reads_file_from_override_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            "[weather_api]\napi_token = \"TOKEN\"\n\n[voice]\nlanguage = \"en\"\n"
        )
        .expect("write config");

        let cfg = AppConfig::load(Some(file.path().to_path_buf())).expect("config must load");
        assert_eq!(cfg.weather_api.api_token, "TOKEN");
    }

    #[test]
    fn log_filter_defaults_to_info() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "").expect("write config");

        let cfg = LogConfig::load(Some(file.path().to_path_buf())).expect("log config must load");
        assert_eq!(cfg.filter, "info");
    }
}
