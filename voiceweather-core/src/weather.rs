use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::WeatherFetchError;
use crate::model::{GeolocationInfo, WeatherReport};

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Client for the current-conditions endpoint of the weather service.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_token: String,
    http: Client,
    endpoint: String,
}

impl WeatherClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_endpoint(api_token, OPENWEATHER_URL)
    }

    /// Point the client at an alternative weather endpoint.
    pub fn with_endpoint(api_token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetch current weather for the resolved location.
    ///
    /// The query is built from `country_name,region_name` as free text; the
    /// weather service is expected to accept that form. HTTP 401 maps to
    /// [`WeatherFetchError::Auth`], any other non-200 status to
    /// [`WeatherFetchError::Status`].
    pub async fn fetch_weather(
        &self,
        location: &GeolocationInfo,
    ) -> Result<WeatherReport, WeatherFetchError> {
        tracing::debug!(
            country = %location.country_name,
            region = %location.region_name,
            "Getting weather information"
        );

        let query = format!("{},{}", location.country_name, location.region_name);

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query.as_str()),
                ("units", "metric"),
                ("appid", self.api_token.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherFetchError::Auth);
        }

        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherFetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwResponse = serde_json::from_str(&body)?;

        Ok(report_from_response(parsed, location.city.clone()))
    }
}

/// Normalize the raw response into a [`WeatherReport`].
fn report_from_response(raw: OwResponse, city: String) -> WeatherReport {
    let mut main = String::new();
    let mut description = String::new();

    // Each entry overwrites the previous one: the last condition in the
    // list is the one that is kept.
    for condition in raw.weather {
        main = condition.main;
        description = condition.description;
    }

    WeatherReport {
        city,
        main,
        description,
        temp: format_temperature(raw.main.temp),
        temp_min: raw.main.temp_min,
        temp_max: raw.main.temp_max,
    }
}

/// Integer part of the Celsius reading, truncated toward zero.
fn format_temperature(temp: f64) -> String {
    format!("{}", temp.trunc() as i64)
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwResponse {
    weather: Vec<OwCondition>,
    main: OwMain,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back up to a char boundary so multi-byte bodies cannot panic the slice.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}
