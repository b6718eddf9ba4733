use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;

use crate::model::GeolocationInfo;

const IP_LOOKUP_URL: &str = "https://api.ipify.org";
const GEOLOCATION_URL: &str = "https://freegeoip.app/json";

/// Resolves the caller's approximate location from their public IP.
///
/// Two sequential lookups: public IP first, then IP-to-location. No retries;
/// the HTTP client's default timeout applies.
#[derive(Debug, Clone)]
pub struct GeoClient {
    http: Client,
    ip_endpoint: String,
    geo_endpoint: String,
}

impl Default for GeoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoClient {
    pub fn new() -> Self {
        Self::with_endpoints(IP_LOOKUP_URL, GEOLOCATION_URL)
    }

    /// Point the client at alternative lookup services.
    pub fn with_endpoints(ip_endpoint: impl Into<String>, geo_endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            ip_endpoint: ip_endpoint.into(),
            geo_endpoint: geo_endpoint.into(),
        }
    }

    pub async fn resolve_location(&self) -> Result<GeolocationInfo> {
        tracing::debug!("Getting external IP address");

        let res = self
            .http
            .get(&self.ip_endpoint)
            .query(&[("format", "json")])
            .send()
            .await
            .context("Failed to send request to the IP lookup service")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read IP lookup response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "IP lookup request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: IpResponse =
            serde_json::from_str(&body).context("Failed to parse IP lookup JSON")?;

        tracing::debug!(ip = %parsed.ip, "Getting geolocation information");

        let url = format!("{}/{}", self.geo_endpoint, parsed.ip);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to the geolocation service")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read geolocation response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Geolocation request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: GeoResponse =
            serde_json::from_str(&body).context("Failed to parse geolocation JSON")?;

        Ok(GeolocationInfo {
            country_name: parsed.country_name,
            region_name: parsed.region_name,
            city: parsed.city,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    country_name: String,
    region_name: String,
    city: String,
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn resolves_location_from_ip() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip": "203.0.113.9" })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/json/203.0.113.9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ip": "203.0.113.9",
                "country_name": "Brazil",
                "region_name": "SP",
                "city": "São Paulo"
            })))
            .mount(&server)
            .await;

        let client = GeoClient::with_endpoints(server.uri(), format!("{}/json", server.uri()));
        let location = client.resolve_location().await.expect("lookup must succeed");

        assert_eq!(location.country_name, "Brazil");
        assert_eq!(location.region_name, "SP");
        assert_eq!(location.city, "São Paulo");
    }

    #[tokio::test]
    async fn malformed_geolocation_json_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip": "203.0.113.9" })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/json/203.0.113.9"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GeoClient::with_endpoints(server.uri(), format!("{}/json", server.uri()));
        let err = client.resolve_location().await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse geolocation JSON"));
    }

    #[test]
    fn long_multibyte_error_bodies_truncate_cleanly() {
        // 300 bytes of 3-byte chars puts the cutoff mid-character.
        let body = "日".repeat(100);
        let truncated = truncate_body(&body);

        assert_eq!(truncated, format!("{}...", "日".repeat(66)));
    }

    #[tokio::test]
    async fn ip_lookup_error_status_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = GeoClient::with_endpoints(server.uri(), format!("{}/json", server.uri()));
        let err = client.resolve_location().await.unwrap_err();

        assert!(err.to_string().contains("status 503"));
    }
}
