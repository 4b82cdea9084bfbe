use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::{
    config::ApiConfig,
    error::{DashboardError, Result},
    model::Location,
};

use super::{Geocoder, http_client, read_body};

/// Name search against the Open-Meteo geocoding API.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
    result_limit: u8,
}

impl GeocodeClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        Ok(Self::with_client(http_client(api)?, api))
    }

    pub fn with_client(http: Client, api: &ApiConfig) -> Self {
        Self {
            http,
            base_url: api.geocoding_url.trim_end_matches('/').to_string(),
            api_key: api.api_key.clone(),
            language: api.language.clone(),
            result_limit: api.result_limit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeoCandidate {
    name: Option<String>,
    admin1: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
}

impl GeoCandidate {
    fn into_location(self, query: &str) -> Result<Location> {
        let latitude = self
            .latitude
            .ok_or_else(|| malformed(query, "candidate has no latitude"))?;
        let longitude = self
            .longitude
            .ok_or_else(|| malformed(query, "candidate has no longitude"))?;
        let timezone = self
            .timezone
            .ok_or_else(|| malformed(query, "candidate has no timezone"))?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(malformed(
                query,
                &format!("coordinates out of range: {latitude}, {longitude}"),
            ));
        }

        let timezone: Tz = timezone
            .parse()
            .map_err(|_| malformed(query, &format!("unknown timezone '{timezone}'")))?;

        Ok(Location {
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| query.to_string()),
            admin_region: self.admin1,
            country: self.country,
            latitude,
            longitude,
            timezone,
        })
    }
}

fn malformed(query: &str, detail: &str) -> DashboardError {
    DashboardError::MalformedResponse(format!("geocoding '{query}': {detail}"))
}

#[async_trait]
impl Geocoder for GeocodeClient {
    #[instrument(skip(self))]
    async fn resolve(&self, city_name: &str) -> Result<Location> {
        let query = city_name.trim();
        if query.is_empty() {
            return Err(DashboardError::InvalidInput(
                "Please enter a city name.".to_string(),
            ));
        }

        let url = format!("{}/search", self.base_url);
        let count = self.result_limit.to_string();
        debug!("Geocoding request: {url} name={query}");

        let mut req = self.http.get(&url).query(&[
            ("name", query),
            ("count", count.as_str()),
            ("language", self.language.as_str()),
            ("format", "json"),
        ]);
        if let Some(key) = &self.api_key {
            req = req.query(&[("apikey", key.as_str())]);
        }

        let res = req
            .send()
            .await
            .map_err(|e| DashboardError::transport("Failed to send geocoding request", e))?;
        let body = read_body(res, "Geocoding").await?;

        let parsed: GeoResponse = serde_json::from_str(&body)
            .map_err(|e| malformed(query, &format!("unexpected JSON: {e}")))?;

        let candidate = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::NotFound {
                query: query.to_string(),
            })?;

        let location = candidate.into_location(query)?;
        info!(
            "Resolved '{query}' to {} ({:.4}, {:.4}, {})",
            location.display_name(),
            location.latitude,
            location.longitude,
            location.timezone
        );

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeocodeClient {
        let api = ApiConfig {
            geocoding_url: server.uri(),
            ..ApiConfig::default()
        };
        GeocodeClient::new(&api).unwrap()
    }

    #[tokio::test]
    async fn resolves_first_candidate() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "Springfield"))
            .and(query_param("count", "1"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {
                        "name": "Springfield", "admin1": "Illinois", "country": "United States",
                        "latitude": 39.80172, "longitude": -89.64371, "timezone": "America/Chicago"
                    },
                    {
                        "name": "Springfield", "admin1": "Missouri", "country": "United States",
                        "latitude": 37.21533, "longitude": -93.29824, "timezone": "America/Chicago"
                    }
                ],
                "generationtime_ms": 0.5
            })))
            .mount(&server)
            .await;

        let loc = client(&server).resolve("  Springfield ").await.unwrap();

        assert_eq!(loc.display_name(), "Springfield, Illinois, United States");
        assert_eq!(loc.latitude, 39.80172);
        assert_eq!(loc.timezone, chrono_tz::America::Chicago);
    }

    #[tokio::test]
    async fn no_results_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generationtime_ms": 0.3})))
            .mount(&server)
            .await;

        let err = client(&server).resolve("Atlantis").await.unwrap_err();
        assert!(matches!(err, DashboardError::NotFound { ref query } if query == "Atlantis"));
    }

    #[tokio::test]
    async fn missing_timezone_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "Nowhere", "latitude": 1.0, "longitude": 2.0}]
            })))
            .mount(&server)
            .await;

        let err = client(&server).resolve("Nowhere").await.unwrap_err();
        assert!(matches!(err, DashboardError::MalformedResponse(ref m) if m.contains("timezone")));
    }

    #[tokio::test]
    async fn bogus_timezone_and_coordinates_are_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "Mars"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "Mars", "latitude": 120.0, "longitude": 2.0, "timezone": "UTC"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "Venus"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "Venus", "latitude": 1.0, "longitude": 2.0, "timezone": "Mars/Olympus"}]
            })))
            .mount(&server)
            .await;

        let geocoder = client(&server);
        let err = geocoder.resolve("Mars").await.unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let err = geocoder.resolve("Venus").await.unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[tokio::test]
    async fn throttling_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "60"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).resolve("Paris").await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::UpstreamRateLimited {
                retry_after_secs: Some(60)
            }
        ));
    }

    #[tokio::test]
    async fn server_error_is_transport() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client(&server).resolve("Paris").await.unwrap_err();
        assert!(matches!(err, DashboardError::Transport(ref m) if m.contains("502")));
    }

    #[tokio::test]
    async fn blank_input_never_hits_the_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server).resolve("   ").await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport() {
        let api = ApiConfig {
            geocoding_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..ApiConfig::default()
        };

        let err = GeocodeClient::new(&api).unwrap().resolve("Paris").await.unwrap_err();
        assert!(matches!(err, DashboardError::Transport(_)));
    }
}
