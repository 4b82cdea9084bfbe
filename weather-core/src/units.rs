//! Measurement units understood by the forecast endpoint and the conversions
//! between them.
//!
//! Each unit has two spellings: the request parameter value (`kmh`) and the
//! label the endpoint echoes back in its `*_units` maps (`km/h`).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 2] = [TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];

    pub fn as_param(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "°C" | "celsius" => Some(TemperatureUnit::Celsius),
            "°F" | "fahrenheit" => Some(TemperatureUnit::Fahrenheit),
            _ => None,
        }
    }

    pub fn convert(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
        match (from, to) {
            (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
            (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => (value - 32.0) * 5.0 / 9.0,
            _ => value,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
    Kn,
}

impl WindSpeedUnit {
    pub const ALL: [WindSpeedUnit; 4] = [
        WindSpeedUnit::Kmh,
        WindSpeedUnit::Ms,
        WindSpeedUnit::Mph,
        WindSpeedUnit::Kn,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "kmh",
            WindSpeedUnit::Ms => "ms",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Kn => "kn",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "km/h",
            WindSpeedUnit::Ms => "m/s",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Kn => "kn",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "km/h" | "kmh" => Some(WindSpeedUnit::Kmh),
            "m/s" | "ms" => Some(WindSpeedUnit::Ms),
            "mp/h" | "mph" => Some(WindSpeedUnit::Mph),
            "kn" | "knots" => Some(WindSpeedUnit::Kn),
            _ => None,
        }
    }

    /// Metres per second in one unit of `self`.
    pub fn metres_per_second(&self) -> f64 {
        match self {
            WindSpeedUnit::Kmh => 1.0 / 3.6,
            WindSpeedUnit::Ms => 1.0,
            WindSpeedUnit::Mph => 0.44704,
            WindSpeedUnit::Kn => 1852.0 / 3600.0,
        }
    }

    /// Multiplier taking a value in `from` to `to`.
    pub fn factor(from: WindSpeedUnit, to: WindSpeedUnit) -> f64 {
        if from == to {
            1.0
        } else {
            from.metres_per_second() / to.metres_per_second()
        }
    }

    pub fn convert(value: f64, from: WindSpeedUnit, to: WindSpeedUnit) -> f64 {
        if from == to {
            value
        } else {
            value * Self::factor(from, to)
        }
    }
}

impl fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Precipitation is requested in a pinned unit and passed through unconverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Inch,
}

impl PrecipitationUnit {
    pub fn as_param(&self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Inch => "inch",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Inch => "in",
        }
    }
}

impl fmt::Display for PrecipitationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
