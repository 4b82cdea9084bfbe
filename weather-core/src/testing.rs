//! Fixtures shared by the unit tests: one week of Open-Meteo output for
//! Springfield, IL starting at local midnight on 2024-06-01.

use chrono::{NaiveDate, TimeDelta};
use serde_json::{Map, Value, json};

use crate::{model::Location, provider::open_meteo::ForecastResponse, raw::RawForecast};

pub fn springfield() -> Location {
    Location {
        name: "Springfield".into(),
        admin_region: Some("Illinois".into()),
        country: Some("United States".into()),
        latitude: 39.80172,
        longitude: -89.64371,
        timezone: chrono_tz::America::Chicago,
    }
}

fn column(n: usize, f: impl Fn(usize) -> Value) -> Value {
    Value::Array((0..n).map(f).collect())
}

pub fn forecast_body() -> Value {
    let hours = 7 * 24;
    let start = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();

    let mut hourly = Map::new();
    hourly.insert(
        "time".into(),
        column(hours, |i| {
            json!((start + TimeDelta::hours(i as i64)).format("%Y-%m-%dT%H:%M").to_string())
        }),
    );
    hourly.insert("temperature_2m".into(), column(hours, |i| json!(15.0 + (i % 24) as f64 * 0.5)));
    hourly.insert("relative_humidity_2m".into(), column(hours, |i| json!(60 + i % 10)));
    let codes = [0, 1, 2, 3];
    hourly.insert("weather_code".into(), column(hours, |i| json!(codes[i % 4])));
    hourly.insert("precipitation".into(), column(hours, |i| {
        let mm = if i % 6 == 0 { 0.2 } else { 0.0 };
        json!(mm)
    }));
    hourly.insert("precipitation_probability".into(), column(hours, |i| json!((i * 7) % 100)));
    hourly.insert("cloud_cover".into(), column(hours, |i| json!((i * 13) % 101)));
    hourly.insert("wind_speed_10m".into(), column(hours, |i| json!(10.0 + (i % 5) as f64)));
    hourly.insert("wind_gusts_10m".into(), column(hours, |i| json!(20.0 + (i % 5) as f64)));
    hourly.insert("apparent_temperature".into(), column(hours, |i| json!(14.0 + (i % 24) as f64 * 0.5)));
    for (k, field) in [
        "soil_temperature_0cm",
        "soil_temperature_6cm",
        "soil_temperature_18cm",
        "soil_temperature_54cm",
    ]
    .into_iter()
    .enumerate()
    {
        hourly.insert(
            field.into(),
            column(hours, move |i| json!(15.0 - k as f64 + (i % 24) as f64 * 0.25)),
        );
    }
    for (k, field) in [
        "soil_moisture_0_to_1cm",
        "soil_moisture_1_to_3cm",
        "soil_moisture_3_to_9cm",
        "soil_moisture_9_to_27cm",
        "soil_moisture_27_to_81cm",
    ]
    .into_iter()
    .enumerate()
    {
        hourly.insert(field.into(), column(hours, move |_| json!(0.25 + k as f64 * 0.02)));
    }

    let days = 7;
    let day = |i: usize| NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + TimeDelta::days(i as i64);

    json!({
        "latitude": 39.8,
        "longitude": -89.64,
        "generationtime_ms": 1.2,
        "utc_offset_seconds": -18000,
        "timezone": "America/Chicago",
        "timezone_abbreviation": "CDT",
        "elevation": 182.0,
        "current_units": {
            "time": "iso8601", "interval": "seconds",
            "temperature_2m": "°C", "relative_humidity_2m": "%", "apparent_temperature": "°C",
            "is_day": "", "precipitation": "mm", "weather_code": "wmo code", "cloud_cover": "%",
            "wind_speed_10m": "km/h", "wind_gusts_10m": "km/h", "uv_index": ""
        },
        "current": {
            "time": "2024-06-01T14:15", "interval": 900,
            "temperature_2m": 24.3, "relative_humidity_2m": 55, "apparent_temperature": 25.1,
            "is_day": 1, "precipitation": 0.0, "weather_code": 2, "cloud_cover": 40,
            "wind_speed_10m": 18.0, "wind_gusts_10m": 31.0, "uv_index": 6.1
        },
        "hourly_units": {
            "time": "iso8601", "temperature_2m": "°C", "relative_humidity_2m": "%",
            "weather_code": "wmo code", "precipitation": "mm", "precipitation_probability": "%",
            "cloud_cover": "%", "wind_speed_10m": "km/h", "wind_gusts_10m": "km/h",
            "apparent_temperature": "°C",
            "soil_temperature_0cm": "°C", "soil_temperature_6cm": "°C",
            "soil_temperature_18cm": "°C", "soil_temperature_54cm": "°C",
            "soil_moisture_0_to_1cm": "m³/m³", "soil_moisture_1_to_3cm": "m³/m³",
            "soil_moisture_3_to_9cm": "m³/m³", "soil_moisture_9_to_27cm": "m³/m³",
            "soil_moisture_27_to_81cm": "m³/m³"
        },
        "hourly": Value::Object(hourly),
        "daily_units": {
            "time": "iso8601", "weather_code": "wmo code",
            "temperature_2m_max": "°C", "temperature_2m_min": "°C",
            "apparent_temperature_max": "°C", "apparent_temperature_min": "°C",
            "sunrise": "iso8601", "sunset": "iso8601", "precipitation_sum": "mm",
            "precipitation_probability_max": "%", "wind_speed_10m_max": "km/h", "uv_index_max": ""
        },
        "daily": {
            "time": column(days, |i| json!(day(i).format("%Y-%m-%d").to_string())),
            "weather_code": [3, 61, 80, 2, 0, 1, 95],
            "temperature_2m_max": [27.1, 24.0, 22.8, 26.5, 29.9, 30.2, 25.4],
            "temperature_2m_min": [15.0, 16.2, 14.9, 13.3, 17.0, 19.1, 18.4],
            "apparent_temperature_max": [28.0, 24.9, 22.1, 26.0, 31.2, 32.0, 26.1],
            "apparent_temperature_min": [14.2, 15.8, 13.5, 12.9, 16.8, 19.0, 18.0],
            "sunrise": column(days, |i| json!(format!("{}T05:31", day(i).format("%Y-%m-%d")))),
            "sunset": column(days, |i| json!(format!("{}T20:25", day(i).format("%Y-%m-%d")))),
            "precipitation_sum": [0.0, 6.4, 12.1, 0.3, 0.0, 0.0, 18.7],
            "precipitation_probability_max": [10, 80, 95, 20, 0, 5, 90],
            "wind_speed_10m_max": [21.3, 30.0, 27.4, 15.2, 12.0, 14.8, 35.6],
            "uv_index_max": [7.5, 4.1, 3.0, 7.9, 8.3, 8.0, 5.2]
        }
    })
}

pub fn raw_forecast() -> RawForecast {
    serde_json::from_value::<ForecastResponse>(forecast_body())
        .unwrap()
        .into_raw()
        .unwrap()
}
