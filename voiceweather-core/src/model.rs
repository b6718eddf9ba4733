use serde::{Deserialize, Serialize};

/// Approximate location of the caller, resolved from their public IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationInfo {
    pub country_name: String,
    pub region_name: String,
    pub city: String,
}

/// Normalized current-weather record for one run.
///
/// `temp` is the integer part of the Celsius reading as a string, truncated
/// rather than rounded. When the upstream response carries more than one
/// condition entry, `main` and `description` hold the LAST entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub main: String,
    pub description: String,
    pub temp: String,
    pub temp_min: f64,
    pub temp_max: f64,
}
