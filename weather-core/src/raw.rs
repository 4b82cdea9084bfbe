//! Raw payloads as they come off the wire, before any validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One granularity of a forecast response: the variable map (`time` included)
/// and the unit labels the endpoint reported for it.
///
/// Values stay loose JSON. Column shapes are checked by the normalizer alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub values: BTreeMap<String, Value>,
    #[serde(default)]
    pub units: BTreeMap<String, String>,
}

impl RawBlock {
    pub fn new(values: BTreeMap<String, Value>, units: BTreeMap<String, String>) -> Self {
        Self { values, units }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn unit(&self, field: &str) -> Option<&str> {
        self.units.get(field).map(String::as_str)
    }
}

/// The three raw payloads of one forecast fetch plus response metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    pub current: RawBlock,
    pub hourly: RawBlock,
    pub daily: RawBlock,

    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub utc_offset_seconds: Option<i32>,
    pub elevation: Option<f64>,
}
