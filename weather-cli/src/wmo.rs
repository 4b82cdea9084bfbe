//! WMO weather interpretation codes as shown on screen.

use weather_dash_core::WeatherCode;

pub fn describe(code: WeatherCode) -> Option<&'static str> {
    let label = match code.0 {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm, slight hail",
        99 => "Thunderstorm, heavy hail",
        _ => return None,
    };
    Some(label)
}

pub fn icon(code: WeatherCode) -> &'static str {
    match code.0 {
        0 => "☀️",
        1 => "🌤️",
        2 => "🌥️",
        3 => "☁️",
        45 | 48 => "🌫️",
        51 | 53 | 55 => "💧",
        56 | 57 | 66 | 67 => "🥶",
        61 | 63 | 65 => "🌧️",
        71 | 73 | 75 | 77 | 85 | 86 => "🌨️",
        80..=82 => "🌦️",
        95 | 96 | 99 => "⛈️",
        _ => "❓",
    }
}

/// Label for a possibly-missing code.
pub fn label(code: Option<WeatherCode>) -> String {
    match code {
        Some(c) => match describe(c) {
            Some(text) => format!("{text} {}", icon(c)),
            None => format!("Code {c} {}", icon(c)),
        },
        None => "N/A".to_string(),
    }
}
