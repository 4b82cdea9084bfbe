//! Normalization of raw forecast payloads into the three dashboard tables.
//!
//! This is the only place where upstream field names, unit labels and
//! timestamp strings are interpreted. Whatever leaves this module is final:
//! local time, display units, stable column names.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::{Config, UnitsConfig},
    error::{DashboardError, Granularity, Result},
    model::{
        CurrentSnapshot, DailyRow, DailySeries, DashboardData, ForecastMeta, HourlyRow,
        HourlySeries, Location, SoilMoistureDepth, SoilMoistureProfile, SoilTemperatureDepth,
        SoilTemperatureProfile, TableUnits, WeatherCode,
    },
    raw::{RawBlock, RawForecast},
    units::{TemperatureUnit, WindSpeedUnit},
    variables::{self, current, daily, hourly},
};

/// Number of rows in the "next hours" strip.
pub const UPCOMING_HOURS: usize = 8;

/// Select the first `count` rows at or after the start of `now`'s hour.
///
/// Returns fewer rows when the series runs out. Pure: the same arguments
/// always give the same slice.
pub fn slice_upcoming(series: &HourlySeries, now: NaiveDateTime, count: usize) -> HourlySeries {
    let hour_start = truncate_to_hour(now);
    let rows = series.rows();
    let start = rows.partition_point(|row| row.time < hour_start);
    let end = start.saturating_add(count).min(rows.len());

    HourlySeries::from_rows(rows[start..end].to_vec())
}

fn truncate_to_hour(t: NaiveDateTime) -> NaiveDateTime {
    t.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Turns a [`RawForecast`] into [`DashboardData`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    units: UnitsConfig,
    forecast_days: usize,
}

impl Normalizer {
    pub fn new(units: UnitsConfig, forecast_days: u8) -> Self {
        Self {
            units,
            forecast_days: usize::from(forecast_days),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.units, config.api.forecast_days)
    }

    pub fn table_units(&self) -> TableUnits {
        TableUnits {
            temperature: self.units.display.temperature,
            wind_speed: self.units.display.wind_speed,
            precipitation: self.units.upstream.precipitation,
        }
    }

    pub fn normalize(&self, raw: &RawForecast, location: &Location) -> Result<DashboardData> {
        if let Some(tz) = raw.timezone.as_deref() {
            if tz != location.timezone.name() {
                return Err(DashboardError::schema(
                    Granularity::Current,
                    format!(
                        "response timezone '{tz}' does not match location timezone '{}'",
                        location.timezone.name()
                    ),
                ));
            }
        }

        let hourly = self.normalize_hourly(&raw.hourly)?;
        let daily = self.normalize_daily(&raw.daily)?;
        let uv_today = self.uv_index_max_today(&raw.daily, &raw.hourly, &hourly, &daily)?;
        let current = self.normalize_current(&raw.current, uv_today)?;

        debug!(
            hourly_rows = hourly.len(),
            daily_rows = daily.len(),
            observed = %current.observation_time,
            "Normalized forecast for {}",
            location.display_name()
        );

        Ok(DashboardData {
            location: location.clone(),
            meta: ForecastMeta {
                elevation_m: raw.elevation,
                timezone_abbreviation: raw.timezone_abbreviation.clone(),
                utc_offset_seconds: raw.utc_offset_seconds,
            },
            units: self.table_units(),
            current,
            hourly,
            daily,
        })
    }

    fn normalize_current(&self, block: &RawBlock, uv_today: Option<f64>) -> Result<CurrentSnapshot> {
        let g = Granularity::Current;
        let field = |name: &str| scalar(block, g, name);

        let observation_time = match field(variables::TIME)? {
            Value::String(s) => parse_local_datetime(s)
                .ok_or_else(|| DashboardError::schema(g, format!("unparseable time '{s}'")))?,
            other => {
                return Err(DashboardError::schema(g, format!("time is not a string: {other}")));
            }
        };

        let number = |name: &str| number_cell(field(name)?, g, name);
        let percent = |name: &str| percent_cell(field(name)?, g, name);

        let temp_unit = self.temperature_unit(block, g, current::TEMPERATURE)?;
        let apparent_unit = self.temperature_unit(block, g, current::APPARENT_TEMPERATURE)?;
        let wind_unit = self.wind_unit(block, g, current::WIND_SPEED)?;
        let gust_unit = self.wind_unit(block, g, current::WIND_GUSTS)?;

        Ok(CurrentSnapshot {
            observation_time,
            temperature: self.temperature(number(current::TEMPERATURE)?, temp_unit),
            feels_like: self.temperature(number(current::APPARENT_TEMPERATURE)?, apparent_unit),
            humidity_percent: percent(current::RELATIVE_HUMIDITY)?,
            wind_speed: self.wind(number(current::WIND_SPEED)?, wind_unit),
            wind_gust_speed: self.wind(number(current::WIND_GUSTS)?, gust_unit),
            uv_index_max_today: uv_today,
            weather_code: code_cell(field(current::WEATHER_CODE)?, g, current::WEATHER_CODE)?,
            is_day: flag_cell(field(current::IS_DAY)?, g, current::IS_DAY)?,
            precipitation: number(current::PRECIPITATION)?,
            cloud_cover_percent: percent(current::CLOUD_COVER)?,
            uv_index: number(current::UV_INDEX)?,
        })
    }

    fn normalize_hourly(&self, block: &RawBlock) -> Result<HourlySeries> {
        let g = Granularity::Hourly;
        let times = hourly_times(block)?;
        let cols = Columns::new(block, g, times.len());

        let temperature = self.temperatures(&cols, hourly::TEMPERATURE)?;
        let apparent = self.temperatures(&cols, hourly::APPARENT_TEMPERATURE)?;
        let precip_prob = cols.percents(hourly::PRECIPITATION_PROBABILITY)?;
        let wind = self.wind_speeds(&cols, hourly::WIND_SPEED)?;
        let gusts = self.wind_speeds(&cols, hourly::WIND_GUSTS)?;
        let humidity = cols.percents(hourly::RELATIVE_HUMIDITY)?;
        let codes = cols.codes(hourly::WEATHER_CODE)?;
        let precipitation = cols.numbers(hourly::PRECIPITATION)?;
        let cloud_cover = cols.percents(hourly::CLOUD_COVER)?;

        let soil_temp = SoilTemperatureDepth::ALL
            .iter()
            .map(|d| self.temperatures(&cols, d.raw_field()))
            .collect::<Result<Vec<_>>>()?;
        let soil_moisture = SoilMoistureDepth::ALL
            .iter()
            .map(|d| cols.numbers(d.raw_field()))
            .collect::<Result<Vec<_>>>()?;

        let rows = times
            .into_iter()
            .enumerate()
            .map(|(i, time)| HourlyRow {
                time,
                temperature: temperature[i],
                apparent_temperature: apparent[i],
                precipitation_probability_percent: precip_prob[i],
                wind_speed: wind[i],
                soil_temperature: SoilTemperatureProfile {
                    surface: soil_temp[0][i],
                    shallow: soil_temp[1][i],
                    mid: soil_temp[2][i],
                    deep: soil_temp[3][i],
                },
                soil_moisture: SoilMoistureProfile {
                    cm_0_to_1: soil_moisture[0][i],
                    cm_1_to_3: soil_moisture[1][i],
                    cm_3_to_9: soil_moisture[2][i],
                    cm_9_to_27: soil_moisture[3][i],
                    cm_27_to_81: soil_moisture[4][i],
                },
                relative_humidity_percent: humidity[i],
                weather_code: codes[i],
                precipitation: precipitation[i],
                cloud_cover_percent: cloud_cover[i],
                wind_gust_speed: gusts[i],
            })
            .collect();

        Ok(HourlySeries::from_rows(rows))
    }

    fn normalize_daily(&self, block: &RawBlock) -> Result<DailySeries> {
        let g = Granularity::Daily;
        let dates = daily_dates(block)?;
        if dates.len() != self.forecast_days {
            return Err(DashboardError::schema(
                g,
                format!("expected {} days, got {}", self.forecast_days, dates.len()),
            ));
        }
        let cols = Columns::new(block, g, dates.len());

        let max = self.temperatures(&cols, daily::TEMPERATURE_MAX)?;
        let min = self.temperatures(&cols, daily::TEMPERATURE_MIN)?;
        let apparent_max = self.temperatures(&cols, daily::APPARENT_TEMPERATURE_MAX)?;
        let apparent_min = self.temperatures(&cols, daily::APPARENT_TEMPERATURE_MIN)?;
        let codes = cols.codes(daily::WEATHER_CODE)?;
        let precip_prob = cols.percents(daily::PRECIPITATION_PROBABILITY_MAX)?;
        let precip_sum = cols.numbers(daily::PRECIPITATION_SUM)?;
        let wind_max = self.wind_speeds(&cols, daily::WIND_SPEED_MAX)?;
        let sunrise = cols.datetimes(daily::SUNRISE)?;
        let sunset = cols.datetimes(daily::SUNSET)?;
        let uv_max = if cols.has(daily::UV_INDEX_MAX) {
            cols.numbers(daily::UV_INDEX_MAX)?
        } else {
            vec![None; dates.len()]
        };

        let rows = dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| DailyRow {
                date,
                temperature_max: max[i],
                temperature_min: min[i],
                weather_code: codes[i],
                precipitation_probability_max_percent: precip_prob[i],
                wind_speed_max: wind_max[i],
                apparent_temperature_max: apparent_max[i],
                apparent_temperature_min: apparent_min[i],
                sunrise: sunrise[i],
                sunset: sunset[i],
                precipitation_sum: precip_sum[i],
                uv_index_max: uv_max[i],
            })
            .collect();

        Ok(DailySeries::from_rows(rows))
    }

    /// Today's UV maximum: the first daily row's `uv_index_max` when the daily
    /// block has that column, otherwise the maximum of today's hourly `uv_index`.
    fn uv_index_max_today(
        &self,
        raw_daily: &RawBlock,
        raw_hourly: &RawBlock,
        hourly: &HourlySeries,
        daily: &DailySeries,
    ) -> Result<Option<f64>> {
        let Some(today) = daily.first() else {
            return Err(DashboardError::EmptySeries(Granularity::Daily));
        };

        if raw_daily.get(daily::UV_INDEX_MAX).is_some() {
            return Ok(today.uv_index_max);
        }

        let cols = Columns::new(raw_hourly, Granularity::Hourly, hourly.len());
        if !cols.has(hourly::UV_INDEX) {
            return Err(DashboardError::schema(
                Granularity::Daily,
                format!(
                    "missing column '{}' and no hourly '{}' to derive it from",
                    daily::UV_INDEX_MAX,
                    hourly::UV_INDEX
                ),
            ));
        }

        let uv = cols.numbers(hourly::UV_INDEX)?;
        let max = hourly
            .iter()
            .zip(uv)
            .filter(|(row, _)| row.time.date() == today.date)
            .filter_map(|(_, v)| v)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

        Ok(max)
    }

    fn temperature_unit(&self, block: &RawBlock, g: Granularity, field: &str) -> Result<TemperatureUnit> {
        match block.unit(field) {
            None => Ok(self.units.upstream.temperature),
            Some(label) => TemperatureUnit::from_label(label).ok_or_else(|| {
                DashboardError::schema(g, format!("unknown temperature unit '{label}' for '{field}'"))
            }),
        }
    }

    fn wind_unit(&self, block: &RawBlock, g: Granularity, field: &str) -> Result<WindSpeedUnit> {
        match block.unit(field) {
            None => Ok(self.units.upstream.wind_speed),
            Some(label) => WindSpeedUnit::from_label(label).ok_or_else(|| {
                DashboardError::schema(g, format!("unknown wind speed unit '{label}' for '{field}'"))
            }),
        }
    }

    fn temperature(&self, value: Option<f64>, from: TemperatureUnit) -> Option<f64> {
        value.map(|v| TemperatureUnit::convert(v, from, self.units.display.temperature))
    }

    fn wind(&self, value: Option<f64>, from: WindSpeedUnit) -> Option<f64> {
        value.map(|v| WindSpeedUnit::convert(v, from, self.units.display.wind_speed))
    }

    fn temperatures(&self, cols: &Columns<'_>, field: &str) -> Result<Vec<Option<f64>>> {
        let unit = self.temperature_unit(cols.block, cols.granularity, field)?;
        Ok(cols
            .numbers(field)?
            .into_iter()
            .map(|v| self.temperature(v, unit))
            .collect())
    }

    fn wind_speeds(&self, cols: &Columns<'_>, field: &str) -> Result<Vec<Option<f64>>> {
        let unit = self.wind_unit(cols.block, cols.granularity, field)?;
        Ok(cols
            .numbers(field)?
            .into_iter()
            .map(|v| self.wind(v, unit))
            .collect())
    }
}

/// Typed access to the parallel arrays of one block, all checked against the
/// length of its `time` array.
struct Columns<'a> {
    block: &'a RawBlock,
    granularity: Granularity,
    rows: usize,
}

impl<'a> Columns<'a> {
    fn new(block: &'a RawBlock, granularity: Granularity, rows: usize) -> Self {
        Self {
            block,
            granularity,
            rows,
        }
    }

    fn has(&self, field: &str) -> bool {
        self.block.get(field).is_some()
    }

    fn array(&self, field: &str) -> Result<&'a [Value]> {
        let g = self.granularity;
        match self.block.get(field) {
            None => Err(DashboardError::schema(g, format!("missing column '{field}'"))),
            Some(Value::Array(cells)) if cells.len() == self.rows => Ok(cells),
            Some(Value::Array(cells)) => Err(DashboardError::schema(
                g,
                format!(
                    "column '{field}' has {} values for {} timestamps",
                    cells.len(),
                    self.rows
                ),
            )),
            Some(_) => Err(DashboardError::schema(g, format!("column '{field}' is not an array"))),
        }
    }

    fn numbers(&self, field: &str) -> Result<Vec<Option<f64>>> {
        self.array(field)?
            .iter()
            .map(|cell| number_cell(cell, self.granularity, field))
            .collect()
    }

    fn percents(&self, field: &str) -> Result<Vec<Option<u8>>> {
        self.array(field)?
            .iter()
            .map(|cell| percent_cell(cell, self.granularity, field))
            .collect()
    }

    fn codes(&self, field: &str) -> Result<Vec<Option<WeatherCode>>> {
        self.array(field)?
            .iter()
            .map(|cell| code_cell(cell, self.granularity, field))
            .collect()
    }

    fn datetimes(&self, field: &str) -> Result<Vec<Option<NaiveDateTime>>> {
        self.array(field)?
            .iter()
            .map(|cell| match cell {
                Value::Null => Ok(None),
                Value::String(s) => parse_local_datetime(s).map(Some).ok_or_else(|| {
                    DashboardError::schema(self.granularity, format!("unparseable '{field}' value '{s}'"))
                }),
                other => Err(DashboardError::schema(
                    self.granularity,
                    format!("'{field}' holds non-string value {other}"),
                )),
            })
            .collect()
    }
}

fn scalar<'a>(block: &'a RawBlock, g: Granularity, field: &str) -> Result<&'a Value> {
    block
        .get(field)
        .ok_or_else(|| DashboardError::schema(g, format!("missing field '{field}'")))
}

fn time_strings<'a>(block: &'a RawBlock, g: Granularity) -> Result<Vec<&'a str>> {
    let cells = match block.get(variables::TIME) {
        None => return Err(DashboardError::schema(g, "missing column 'time'")),
        Some(Value::Array(cells)) => cells,
        Some(_) => return Err(DashboardError::schema(g, "column 'time' is not an array")),
    };
    if cells.is_empty() {
        return Err(DashboardError::EmptySeries(g));
    }

    cells
        .iter()
        .map(|cell| {
            cell.as_str()
                .ok_or_else(|| DashboardError::schema(g, format!("non-string timestamp {cell}")))
        })
        .collect()
}

fn hourly_times(block: &RawBlock) -> Result<Vec<NaiveDateTime>> {
    let g = Granularity::Hourly;
    let times = time_strings(block, g)?
        .into_iter()
        .map(|s| {
            parse_local_datetime(s)
                .ok_or_else(|| DashboardError::schema(g, format!("unparseable timestamp '{s}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    ensure_spacing(&times, TimeDelta::hours(1), g)?;
    Ok(times)
}

fn daily_dates(block: &RawBlock) -> Result<Vec<NaiveDate>> {
    let g = Granularity::Daily;
    let dates = time_strings(block, g)?
        .into_iter()
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| DashboardError::schema(g, format!("unparseable date '{s}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    ensure_spacing(&dates, TimeDelta::days(1), g)?;
    Ok(dates)
}

fn ensure_spacing<T>(stamps: &[T], step: TimeDelta, g: Granularity) -> Result<()>
where
    T: Copy + std::fmt::Display + std::ops::Sub<T, Output = TimeDelta>,
{
    for pair in stamps.windows(2) {
        if pair[1] - pair[0] != step {
            return Err(DashboardError::schema(
                g,
                format!("timestamps not contiguous between {} and {}", pair[0], pair[1]),
            ));
        }
    }
    Ok(())
}

/// Local timestamps come as `2024-06-01T14:00`, occasionally with seconds.
pub(crate) fn parse_local_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn number_cell(cell: &Value, g: Granularity, field: &str) -> Result<Option<f64>> {
    match cell {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| DashboardError::schema(g, format!("'{field}' value {n} out of range"))),
        other => Err(DashboardError::schema(
            g,
            format!("'{field}' holds non-numeric value {other}"),
        )),
    }
}

fn percent_cell(cell: &Value, g: Granularity, field: &str) -> Result<Option<u8>> {
    match number_cell(cell, g, field)? {
        None => Ok(None),
        Some(v) if (0.0..=100.0).contains(&v) => Ok(Some(v.round() as u8)),
        Some(v) => Err(DashboardError::schema(
            g,
            format!("'{field}' value {v} is not a percentage"),
        )),
    }
}

fn code_cell(cell: &Value, g: Granularity, field: &str) -> Result<Option<WeatherCode>> {
    match number_cell(cell, g, field)? {
        None => Ok(None),
        Some(v) if v.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&v) => {
            Ok(Some(WeatherCode(v as u8)))
        }
        Some(v) => Err(DashboardError::schema(
            g,
            format!("'{field}' value {v} is not a weather code"),
        )),
    }
}

fn flag_cell(cell: &Value, g: Granularity, field: &str) -> Result<Option<bool>> {
    match cell {
        Value::Bool(b) => Ok(Some(*b)),
        _ => match number_cell(cell, g, field)? {
            None => Ok(None),
            Some(v) if v == 0.0 => Ok(Some(false)),
            Some(v) if v == 1.0 => Ok(Some(true)),
            Some(v) => Err(DashboardError::schema(g, format!("'{field}' value {v} is not 0 or 1"))),
        },
    }
}
