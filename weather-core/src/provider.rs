use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header::RETRY_AFTER};
use std::fmt::Debug;

use crate::{
    config::ApiConfig,
    error::{DashboardError, Result},
    model::Location,
    raw::RawForecast,
};

pub mod geocoding;
pub mod open_meteo;

pub use geocoding::GeocodeClient;
pub use open_meteo::WeatherClient;

const USER_AGENT: &str = concat!("weather-dash/", env!("CARGO_PKG_VERSION"));

/// Resolves free text to a single location.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, city_name: &str) -> Result<Location>;
}

/// Fetches the raw current/hourly/daily payloads for a location.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Result<RawForecast>;
}

/// Shared HTTP client honouring the configured timeout.
pub fn http_client(api: &ApiConfig) -> Result<Client> {
    Client::builder()
        .timeout(api.timeout())
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| DashboardError::Transport(format!("Failed to build HTTP client: {e}")))
}

/// Read a response body, mapping throttling and non-success statuses.
pub(crate) async fn read_body(res: Response, what: &str) -> Result<String> {
    let status = res.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = res
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        return Err(DashboardError::UpstreamRateLimited { retry_after_secs });
    }

    let body = res
        .text()
        .await
        .map_err(|e| DashboardError::transport(&format!("Failed to read {what} response body"), e))?;

    if !status.is_success() {
        return Err(DashboardError::Transport(format!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body)
        )));
    }

    Ok(body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("{\"error\":true}"), "{\"error\":true}");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);

        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[test]
    fn http_client_builds_with_defaults() {
        assert!(http_client(&ApiConfig::default()).is_ok());
    }
}
