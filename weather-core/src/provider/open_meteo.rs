use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::{
    config::{ApiConfig, Config, UpstreamUnits},
    error::{DashboardError, Result},
    model::Location,
    raw::{RawBlock, RawForecast},
    variables::{current, daily, hourly},
};

use super::{ForecastSource, http_client, read_body};

/// Forecast fetcher for the Open-Meteo `/forecast` endpoint.
///
/// All three granularities come back from a single request.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    forecast_days: u8,
    units: UpstreamUnits,
}

impl WeatherClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(http_client(&config.api)?, config))
    }

    pub fn with_client(http: Client, config: &Config) -> Self {
        let api: &ApiConfig = &config.api;
        Self {
            http,
            base_url: api.forecast_url.trim_end_matches('/').to_string(),
            api_key: api.api_key.clone(),
            forecast_days: api.forecast_days,
            units: config.units.upstream,
        }
    }

    fn query(&self, location: &Location) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("timezone", location.timezone.name().to_string()),
            ("forecast_days", self.forecast_days.to_string()),
            ("current", current::ALL.join(",")),
            ("hourly", hourly::ALL.join(",")),
            ("daily", daily::ALL.join(",")),
            ("temperature_unit", self.units.temperature.as_param().to_string()),
            ("wind_speed_unit", self.units.wind_speed.as_param().to_string()),
            ("precipitation_unit", self.units.precipitation.as_param().to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.clone()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    timezone: Option<String>,
    timezone_abbreviation: Option<String>,
    utc_offset_seconds: Option<i32>,
    elevation: Option<f64>,

    current: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    current_units: BTreeMap<String, String>,
    hourly: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    hourly_units: BTreeMap<String, String>,
    daily: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    daily_units: BTreeMap<String, String>,
}

impl ForecastResponse {
    pub(crate) fn into_raw(self) -> Result<RawForecast> {
        let block = |values: Option<BTreeMap<String, Value>>, units, name: &str| {
            values
                .map(|values| RawBlock::new(values, units))
                .ok_or_else(|| {
                    DashboardError::MalformedResponse(format!(
                        "forecast response has no '{name}' block"
                    ))
                })
        };

        Ok(RawForecast {
            current: block(self.current, self.current_units, "current")?,
            hourly: block(self.hourly, self.hourly_units, "hourly")?,
            daily: block(self.daily, self.daily_units, "daily")?,
            timezone: self.timezone,
            timezone_abbreviation: self.timezone_abbreviation,
            utc_offset_seconds: self.utc_offset_seconds,
            elevation: self.elevation,
        })
    }
}

#[async_trait]
impl ForecastSource for WeatherClient {
    #[instrument(skip(self, location), fields(lat = location.latitude, lon = location.longitude, tz = %location.timezone))]
    async fn fetch(&self, location: &Location) -> Result<RawForecast> {
        let url = format!("{}/forecast", self.base_url);
        debug!("Forecast request: {url}");

        let res = self
            .http
            .get(&url)
            .query(&self.query(location))
            .send()
            .await
            .map_err(|e| DashboardError::transport("Failed to send forecast request", e))?;
        let body = read_body(res, "Forecast").await?;

        let parsed: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            DashboardError::MalformedResponse(format!("forecast response is not valid JSON: {e}"))
        })?;

        parsed.into_raw()
    }
}
