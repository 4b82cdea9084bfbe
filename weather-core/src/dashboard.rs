use tracing::{info, instrument};

use crate::{
    config::Config,
    error::Result,
    model::DashboardData,
    pipeline::Normalizer,
    provider::{ForecastSource, GeocodeClient, Geocoder, WeatherClient, http_client},
};

/// One linear run: city name -> location -> raw payloads -> tables.
///
/// Holds no state between runs; calling [`Dashboard::load`] twice is two
/// independent requests.
#[derive(Debug)]
pub struct Dashboard {
    geocoder: Box<dyn Geocoder>,
    forecast: Box<dyn ForecastSource>,
    normalizer: Normalizer,
}

impl Dashboard {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        forecast: Box<dyn ForecastSource>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            geocoder,
            forecast,
            normalizer,
        }
    }

    /// Wire the Open-Meteo clients up from config, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = http_client(&config.api)?;

        Ok(Self::new(
            Box::new(GeocodeClient::with_client(http.clone(), &config.api)),
            Box::new(WeatherClient::with_client(http, config)),
            Normalizer::from_config(config),
        ))
    }

    #[instrument(skip(self))]
    pub async fn load(&self, city_name: &str) -> Result<DashboardData> {
        let location = self.geocoder.resolve(city_name).await?;
        let raw = self.forecast.fetch(&location).await?;
        let data = self.normalizer.normalize(&raw, &location)?;

        info!(
            "Loaded {} hourly and {} daily rows for {}",
            data.hourly.len(),
            data.daily.len(),
            data.location.display_name()
        );

        Ok(data)
    }
}
