//! Plain-text dashboard rendering.
//!
//! Everything here reads the normalized tables as-is. Values arrive already
//! in display units, so the only work left is formatting.

use chrono::NaiveDateTime;
use std::fmt::{self, Write};
use weather_dash_core::{
    DailySeries, DashboardData, HourlyRow, HourlySeries, Location, SoilMoistureDepth,
    SoilTemperatureDepth, WeatherCode,
    model::{ForecastMeta, TableUnits},
};

use crate::wmo;

const MISSING: &str = "--";

fn number(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => MISSING.to_string(),
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit}"),
        None => MISSING.to_string(),
    }
}

fn percent(value: Option<u8>) -> String {
    match value {
        Some(v) => format!("{v}%"),
        None => MISSING.to_string(),
    }
}

fn clock(value: Option<NaiveDateTime>) -> String {
    match value {
        Some(t) => t.format("%H:%M").to_string(),
        None => MISSING.to_string(),
    }
}

fn code(value: Option<WeatherCode>) -> String {
    value.map_or_else(|| MISSING.to_string(), |c| c.to_string())
}

fn coordinates(location: &Location) -> String {
    let ns = if location.latitude >= 0.0 { 'N' } else { 'S' };
    let ew = if location.longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.2}°{ns}, {:.2}°{ew}",
        location.latitude.abs(),
        location.longitude.abs()
    )
}

fn caption(location: &Location, meta: &ForecastMeta) -> String {
    let mut parts = vec![coordinates(location)];
    if let Some(elevation) = meta.elevation_m {
        parts.push(format!("{elevation:.0} m"));
    }
    match &meta.timezone_abbreviation {
        Some(abbr) => parts.push(format!("{} ({abbr})", location.timezone)),
        None => parts.push(location.timezone.to_string()),
    }
    parts.join(" · ")
}

/// The full dashboard: header, current tiles, next `hours` hours, soil and outlook.
pub fn dashboard(
    data: &DashboardData,
    now: NaiveDateTime,
    hours: usize,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let units = &data.units;
    let temp = units.temperature.symbol();
    let wind = units.wind_speed.symbol();

    writeln!(out, "Weather for {}", data.location.display_name())?;
    writeln!(out, "{}", now.format("%A, %B %d, %I:%M %p"))?;
    writeln!(out, "{}", caption(&data.location, &data.meta))?;
    writeln!(out)?;

    let current = &data.current;
    writeln!(out, "Now ({})", current.observation_time.format("%H:%M"))?;
    writeln!(out, "  {:<14}{}", "Conditions", wmo::label(current.weather_code))?;
    writeln!(
        out,
        "  {:<14}{} (feels like {})",
        "Temperature",
        with_unit(current.temperature, temp),
        with_unit(current.feels_like, temp)
    )?;
    writeln!(out, "  {:<14}{}", "Humidity", percent(current.humidity_percent))?;
    writeln!(
        out,
        "  {:<14}{} {wind} (gusts {} {wind})",
        "Wind",
        number(current.wind_speed, 1),
        number(current.wind_gust_speed, 1)
    )?;
    writeln!(out, "  {:<14}{}", "UV max today", number(current.uv_index_max_today, 1))?;
    writeln!(out)?;

    let upcoming = data.upcoming_hours(now, hours);
    writeln!(out, "Next {} hours", upcoming.len())?;
    if upcoming.is_empty() {
        writeln!(out, "  No hourly data past {}", now.format("%H:%M"))?;
    }
    for row in &upcoming {
        let speed = format!("{} {wind}", number(row.wind_speed, 1));
        writeln!(
            out,
            "  {}  {:>8}  {:>5}  {speed:>10}  {}",
            row.time.format("%a %H:%M"),
            with_unit(row.temperature, temp),
            percent(row.precipitation_probability_percent),
            wmo::label(row.weather_code)
        )?;
    }
    writeln!(out)?;

    if let Some(row) = upcoming.first() {
        soil(&mut out, row, units)?;
        writeln!(out)?;
    }

    outlook(&mut out, &data.daily, units)?;

    Ok(out)
}

fn soil(out: &mut String, row: &HourlyRow, units: &TableUnits) -> fmt::Result {
    writeln!(out, "Soil at {}", row.time.format("%H:%M"))?;
    for (depth, value) in row.soil_temperature.iter() {
        writeln!(
            out,
            "  {:<8}{:>8}",
            depth.label(),
            with_unit(value, units.temperature.symbol())
        )?;
    }
    for (depth, value) in row.soil_moisture.iter() {
        writeln!(out, "  {:<8}{:>8} m³/m³", depth.label(), number(value, 2))?;
    }
    Ok(())
}

fn outlook(out: &mut String, daily: &DailySeries, units: &TableUnits) -> fmt::Result {
    let temp = units.temperature.symbol();
    writeln!(out, "{}-day outlook", daily.len())?;
    for day in daily {
        let speed = format!("{} {}", number(day.wind_speed_max, 1), units.wind_speed.symbol());
        writeln!(
            out,
            "  {}  {:>8} / {:<8}  {:>5}  {speed:>10}  {}",
            day.date.format("%a %b %d"),
            with_unit(day.temperature_max, temp),
            with_unit(day.temperature_min, temp),
            percent(day.precipitation_probability_max_percent),
            wmo::label(day.weather_code)
        )?;
    }
    Ok(())
}

/// Every hourly and daily row with every column, for inspection.
pub fn raw_tables(data: &DashboardData) -> Result<String, fmt::Error> {
    let mut out = String::new();
    hourly_table(&mut out, &data.hourly, &data.units)?;
    writeln!(out)?;
    daily_table(&mut out, &data.daily, &data.units)?;
    Ok(out)
}

fn hourly_table(out: &mut String, hourly: &HourlySeries, units: &TableUnits) -> fmt::Result {
    writeln!(
        out,
        "Hourly ({}, {}, {})",
        units.temperature.symbol(),
        units.wind_speed.symbol(),
        units.precipitation.symbol()
    )?;
    write!(
        out,
        "{:<17} {:>6} {:>6} {:>4} {:>6} {:>6} {:>4} {:>4} {:>4}",
        "time", "temp", "feels", "pop", "precip", "wind", "gust", "rh", "code"
    )?;
    for header in soil_headers() {
        write!(out, " {header:>7}")?;
    }
    writeln!(out)?;

    for row in hourly {
        write!(
            out,
            "{:<17} {:>6} {:>6} {:>4} {:>6} {:>6} {:>4} {:>4} {:>4}",
            row.time.format("%Y-%m-%d %H:%M"),
            number(row.temperature, 1),
            number(row.apparent_temperature, 1),
            percent(row.precipitation_probability_percent),
            number(row.precipitation, 1),
            number(row.wind_speed, 1),
            number(row.wind_gust_speed, 1),
            percent(row.relative_humidity_percent),
            code(row.weather_code),
        )?;
        for (_, value) in row.soil_temperature.iter() {
            write!(out, " {:>7}", number(value, 1))?;
        }
        for (_, value) in row.soil_moisture.iter() {
            write!(out, " {:>7}", number(value, 3))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn daily_table(out: &mut String, daily: &DailySeries, units: &TableUnits) -> fmt::Result {
    writeln!(
        out,
        "Daily ({}, {}, {})",
        units.temperature.symbol(),
        units.wind_speed.symbol(),
        units.precipitation.symbol()
    )?;
    writeln!(
        out,
        "{:<10} {:>6} {:>6} {:>6} {:>6} {:>4} {:>6} {:>6} {:>4} {:>5} {:>5} {:>4}",
        "date", "max", "min", "f.max", "f.min", "pop", "precip", "wind", "uv", "rise", "set", "code"
    )?;
    for day in daily {
        writeln!(
            out,
            "{:<10} {:>6} {:>6} {:>6} {:>6} {:>4} {:>6} {:>6} {:>4} {:>5} {:>5} {:>4}",
            day.date.format("%Y-%m-%d"),
            number(day.temperature_max, 1),
            number(day.temperature_min, 1),
            number(day.apparent_temperature_max, 1),
            number(day.apparent_temperature_min, 1),
            percent(day.precipitation_probability_max_percent),
            number(day.precipitation_sum, 1),
            number(day.wind_speed_max, 1),
            number(day.uv_index_max, 1),
            clock(day.sunrise),
            clock(day.sunset),
            code(day.weather_code),
        )?;
    }
    Ok(())
}

fn soil_headers() -> impl Iterator<Item = String> {
    SoilTemperatureDepth::ALL
        .iter()
        .map(|d| format!("t{}", d.label()))
        .chain(SoilMoistureDepth::ALL.iter().map(|d| format!("m{}", d.label())))
}
