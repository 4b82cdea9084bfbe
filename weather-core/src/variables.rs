//! Upstream variable names. The same constants shape the forecast request and
//! drive column lookup during normalization, so the two can't drift apart.

pub const TIME: &str = "time";

pub mod current {
    pub const TEMPERATURE: &str = "temperature_2m";
    pub const RELATIVE_HUMIDITY: &str = "relative_humidity_2m";
    pub const APPARENT_TEMPERATURE: &str = "apparent_temperature";
    pub const IS_DAY: &str = "is_day";
    pub const PRECIPITATION: &str = "precipitation";
    pub const WEATHER_CODE: &str = "weather_code";
    pub const CLOUD_COVER: &str = "cloud_cover";
    pub const WIND_SPEED: &str = "wind_speed_10m";
    pub const WIND_GUSTS: &str = "wind_gusts_10m";
    pub const UV_INDEX: &str = "uv_index";

    pub const ALL: &[&str] = &[
        TEMPERATURE,
        RELATIVE_HUMIDITY,
        APPARENT_TEMPERATURE,
        IS_DAY,
        PRECIPITATION,
        WEATHER_CODE,
        CLOUD_COVER,
        WIND_SPEED,
        WIND_GUSTS,
        UV_INDEX,
    ];
}

pub mod hourly {
    pub const TEMPERATURE: &str = "temperature_2m";
    pub const RELATIVE_HUMIDITY: &str = "relative_humidity_2m";
    pub const WEATHER_CODE: &str = "weather_code";
    pub const PRECIPITATION: &str = "precipitation";
    pub const PRECIPITATION_PROBABILITY: &str = "precipitation_probability";
    pub const CLOUD_COVER: &str = "cloud_cover";
    pub const WIND_SPEED: &str = "wind_speed_10m";
    pub const WIND_GUSTS: &str = "wind_gusts_10m";
    pub const APPARENT_TEMPERATURE: &str = "apparent_temperature";
    /// Only consulted when the daily block carries no `uv_index_max`.
    pub const UV_INDEX: &str = "uv_index";

    pub const ALL: &[&str] = &[
        TEMPERATURE,
        RELATIVE_HUMIDITY,
        WEATHER_CODE,
        PRECIPITATION,
        PRECIPITATION_PROBABILITY,
        CLOUD_COVER,
        WIND_SPEED,
        WIND_GUSTS,
        APPARENT_TEMPERATURE,
        "soil_temperature_0cm",
        "soil_temperature_6cm",
        "soil_temperature_18cm",
        "soil_temperature_54cm",
        "soil_moisture_0_to_1cm",
        "soil_moisture_1_to_3cm",
        "soil_moisture_3_to_9cm",
        "soil_moisture_9_to_27cm",
        "soil_moisture_27_to_81cm",
    ];
}

pub mod daily {
    pub const WEATHER_CODE: &str = "weather_code";
    pub const TEMPERATURE_MAX: &str = "temperature_2m_max";
    pub const TEMPERATURE_MIN: &str = "temperature_2m_min";
    pub const APPARENT_TEMPERATURE_MAX: &str = "apparent_temperature_max";
    pub const APPARENT_TEMPERATURE_MIN: &str = "apparent_temperature_min";
    pub const SUNRISE: &str = "sunrise";
    pub const SUNSET: &str = "sunset";
    pub const PRECIPITATION_SUM: &str = "precipitation_sum";
    pub const PRECIPITATION_PROBABILITY_MAX: &str = "precipitation_probability_max";
    pub const WIND_SPEED_MAX: &str = "wind_speed_10m_max";
    pub const UV_INDEX_MAX: &str = "uv_index_max";

    pub const ALL: &[&str] = &[
        WEATHER_CODE,
        TEMPERATURE_MAX,
        TEMPERATURE_MIN,
        APPARENT_TEMPERATURE_MAX,
        APPARENT_TEMPERATURE_MIN,
        SUNRISE,
        SUNSET,
        PRECIPITATION_SUM,
        PRECIPITATION_PROBABILITY_MAX,
        WIND_SPEED_MAX,
        UV_INDEX_MAX,
    ];
}
