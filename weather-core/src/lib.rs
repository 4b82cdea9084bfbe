//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - Configuration (endpoints, timeouts, pinned units)
//! - Clients for the geocoding and forecast endpoints
//! - The normalization pipeline turning raw payloads into tables
//!
//! It is used by `weather-dash`, but any other front-end can render the same
//! [`DashboardData`].

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod raw;
pub mod units;
pub mod variables;

#[cfg(test)]
mod testing;

pub use config::{Config, DisplayUnits, UnitsConfig, UpstreamUnits};
pub use dashboard::Dashboard;
pub use error::{DashboardError, Granularity, Result};
pub use model::{
    CurrentSnapshot, DailyRow, DailySeries, DashboardData, HourlyRow, HourlySeries, Location,
    SoilMoistureDepth, SoilTemperatureDepth, WeatherCode,
};
pub use pipeline::{Normalizer, UPCOMING_HOURS, slice_upcoming};
pub use provider::{ForecastSource, GeocodeClient, Geocoder, WeatherClient};
pub use raw::{RawBlock, RawForecast};
pub use units::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit};
