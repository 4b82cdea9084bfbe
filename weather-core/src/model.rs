use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit};

/// A resolved geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub admin_region: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
}

impl Location {
    /// "name, admin region, country", skipping parts that are absent or blank.
    pub fn display_name(&self) -> String {
        [
            Some(self.name.as_str()),
            self.admin_region.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Wall-clock time at the location for the given instant.
    pub fn local_time(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.timezone).naive_local()
    }

    pub fn local_now(&self) -> NaiveDateTime {
        self.local_time(Utc::now())
    }
}

/// WMO weather interpretation code, kept numeric. Labels belong to whoever renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub u8);

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilTemperatureDepth {
    Surface,
    Shallow,
    Mid,
    Deep,
}

impl SoilTemperatureDepth {
    pub const ALL: [SoilTemperatureDepth; 4] = [
        SoilTemperatureDepth::Surface,
        SoilTemperatureDepth::Shallow,
        SoilTemperatureDepth::Mid,
        SoilTemperatureDepth::Deep,
    ];

    pub fn raw_field(&self) -> &'static str {
        match self {
            SoilTemperatureDepth::Surface => "soil_temperature_0cm",
            SoilTemperatureDepth::Shallow => "soil_temperature_6cm",
            SoilTemperatureDepth::Mid => "soil_temperature_18cm",
            SoilTemperatureDepth::Deep => "soil_temperature_54cm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SoilTemperatureDepth::Surface => "0cm",
            SoilTemperatureDepth::Shallow => "6cm",
            SoilTemperatureDepth::Mid => "18cm",
            SoilTemperatureDepth::Deep => "54cm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilMoistureDepth {
    Cm0To1,
    Cm1To3,
    Cm3To9,
    Cm9To27,
    Cm27To81,
}

impl SoilMoistureDepth {
    pub const ALL: [SoilMoistureDepth; 5] = [
        SoilMoistureDepth::Cm0To1,
        SoilMoistureDepth::Cm1To3,
        SoilMoistureDepth::Cm3To9,
        SoilMoistureDepth::Cm9To27,
        SoilMoistureDepth::Cm27To81,
    ];

    pub fn raw_field(&self) -> &'static str {
        match self {
            SoilMoistureDepth::Cm0To1 => "soil_moisture_0_to_1cm",
            SoilMoistureDepth::Cm1To3 => "soil_moisture_1_to_3cm",
            SoilMoistureDepth::Cm3To9 => "soil_moisture_3_to_9cm",
            SoilMoistureDepth::Cm9To27 => "soil_moisture_9_to_27cm",
            SoilMoistureDepth::Cm27To81 => "soil_moisture_27_to_81cm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SoilMoistureDepth::Cm0To1 => "0-1cm",
            SoilMoistureDepth::Cm1To3 => "1-3cm",
            SoilMoistureDepth::Cm3To9 => "3-9cm",
            SoilMoistureDepth::Cm9To27 => "9-27cm",
            SoilMoistureDepth::Cm27To81 => "27-81cm",
        }
    }
}

/// Soil temperature per depth band, in the table's temperature unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SoilTemperatureProfile {
    pub surface: Option<f64>,
    pub shallow: Option<f64>,
    pub mid: Option<f64>,
    pub deep: Option<f64>,
}

impl SoilTemperatureProfile {
    pub fn get(&self, depth: SoilTemperatureDepth) -> Option<f64> {
        match depth {
            SoilTemperatureDepth::Surface => self.surface,
            SoilTemperatureDepth::Shallow => self.shallow,
            SoilTemperatureDepth::Mid => self.mid,
            SoilTemperatureDepth::Deep => self.deep,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SoilTemperatureDepth, Option<f64>)> + '_ {
        SoilTemperatureDepth::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

/// Volumetric soil moisture (m³/m³) per depth band.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SoilMoistureProfile {
    pub cm_0_to_1: Option<f64>,
    pub cm_1_to_3: Option<f64>,
    pub cm_3_to_9: Option<f64>,
    pub cm_9_to_27: Option<f64>,
    pub cm_27_to_81: Option<f64>,
}

impl SoilMoistureProfile {
    pub fn get(&self, depth: SoilMoistureDepth) -> Option<f64> {
        match depth {
            SoilMoistureDepth::Cm0To1 => self.cm_0_to_1,
            SoilMoistureDepth::Cm1To3 => self.cm_1_to_3,
            SoilMoistureDepth::Cm3To9 => self.cm_3_to_9,
            SoilMoistureDepth::Cm9To27 => self.cm_9_to_27,
            SoilMoistureDepth::Cm27To81 => self.cm_27_to_81,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SoilMoistureDepth, Option<f64>)> + '_ {
        SoilMoistureDepth::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

/// Conditions at the observation instant. `None` means the upstream had no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub observation_time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity_percent: Option<u8>,
    pub wind_speed: Option<f64>,
    pub wind_gust_speed: Option<f64>,
    /// Today's maximum, not the instantaneous reading.
    pub uv_index_max_today: Option<f64>,
    pub weather_code: Option<WeatherCode>,

    pub is_day: Option<bool>,
    pub precipitation: Option<f64>,
    pub cloud_cover_percent: Option<u8>,
    pub uv_index: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRow {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub precipitation_probability_percent: Option<u8>,
    pub wind_speed: Option<f64>,
    pub soil_temperature: SoilTemperatureProfile,
    pub soil_moisture: SoilMoistureProfile,

    pub relative_humidity_percent: Option<u8>,
    pub weather_code: Option<WeatherCode>,
    pub precipitation: Option<f64>,
    pub cloud_cover_percent: Option<u8>,
    pub wind_gust_speed: Option<f64>,
}

/// Hourly rows in local time, strictly increasing at one-hour spacing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourlySeries {
    rows: Vec<HourlyRow>,
}

impl HourlySeries {
    pub(crate) fn from_rows(rows: Vec<HourlyRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[HourlyRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HourlyRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&HourlyRow> {
        self.rows.first()
    }

    /// See [`crate::pipeline::slice_upcoming`].
    pub fn upcoming(&self, now: NaiveDateTime, count: usize) -> HourlySeries {
        crate::pipeline::slice_upcoming(self, now, count)
    }
}

impl<'a> IntoIterator for &'a HourlySeries {
    type Item = &'a HourlyRow;
    type IntoIter = std::slice::Iter<'a, HourlyRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub weather_code: Option<WeatherCode>,
    pub precipitation_probability_max_percent: Option<u8>,
    pub wind_speed_max: Option<f64>,

    pub apparent_temperature_max: Option<f64>,
    pub apparent_temperature_min: Option<f64>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub precipitation_sum: Option<f64>,
    pub uv_index_max: Option<f64>,
}

/// One row per local date, strictly increasing at one-day spacing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySeries {
    rows: Vec<DailyRow>,
}

impl DailySeries {
    pub(crate) fn from_rows(rows: Vec<DailyRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DailyRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&DailyRow> {
        self.rows.first()
    }
}

impl<'a> IntoIterator for &'a DailySeries {
    type Item = &'a DailyRow;
    type IntoIter = std::slice::Iter<'a, DailyRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Units every numeric column of the tables is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableUnits {
    pub temperature: TemperatureUnit,
    pub wind_speed: WindSpeedUnit,
    pub precipitation: PrecipitationUnit,
}

/// Response metadata that is shown but never computed with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastMeta {
    pub elevation_m: Option<f64>,
    pub timezone_abbreviation: Option<String>,
    pub utc_offset_seconds: Option<i32>,
}

/// Everything one render cycle needs, built fresh per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub location: Location,
    pub meta: ForecastMeta,
    pub units: TableUnits,
    pub current: CurrentSnapshot,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

impl DashboardData {
    pub fn upcoming_hours(&self, now: NaiveDateTime, count: usize) -> HourlySeries {
        self.hourly.upcoming(now, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn amritsar() -> Location {
        Location {
            name: "Amritsar".into(),
            admin_region: Some("Punjab".into()),
            country: Some("India".into()),
            latitude: 31.622,
            longitude: 74.875,
            timezone: chrono_tz::Asia::Kolkata,
        }
    }

    #[test]
    fn display_name_joins_present_parts() {
        assert_eq!(amritsar().display_name(), "Amritsar, Punjab, India");

        let mut loc = amritsar();
        loc.admin_region = None;
        loc.country = Some("  ".into());
        assert_eq!(loc.display_name(), "Amritsar");
    }

    #[test]
    fn local_time_applies_the_location_offset() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let local = amritsar().local_time(at);

        assert_eq!(local.to_string(), "2024-06-01 17:30:00");
    }

    #[test]
    fn soil_profiles_are_addressed_by_band() {
        let temps = SoilTemperatureProfile {
            surface: Some(21.0),
            shallow: Some(19.5),
            mid: None,
            deep: Some(15.0),
        };
        assert_eq!(temps.get(SoilTemperatureDepth::Mid), None);
        assert_eq!(temps.get(SoilTemperatureDepth::Deep), Some(15.0));

        let labels: Vec<_> = temps.iter().map(|(d, _)| d.label()).collect();
        assert_eq!(labels, ["0cm", "6cm", "18cm", "54cm"]);

        let moisture = SoilMoistureProfile {
            cm_27_to_81: Some(0.31),
            ..Default::default()
        };
        assert_eq!(moisture.get(SoilMoistureDepth::Cm27To81), Some(0.31));
        assert_eq!(moisture.iter().filter(|(_, v)| v.is_none()).count(), 4);
    }

    #[test]
    fn location_serializes_timezone_by_name() {
        let json = serde_json::to_value(amritsar()).unwrap();
        assert_eq!(json["timezone"], "Asia/Kolkata");
    }
}
