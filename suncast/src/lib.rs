use bon::Builder;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};

/// Human-readable weather condition derived from a WMO weather code.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub enum WeatherCondition {
    Clear,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Foggy,
    Drizzle,
    #[serde(rename = "Freezing Drizzle")]
    FreezingDrizzle,
    Rain,
    #[serde(rename = "Freezing Rain")]
    FreezingRain,
    Snow,
    #[serde(rename = "Snow Grains")]
    SnowGrains,
    #[serde(rename = "Rain Showers")]
    RainShowers,
    #[serde(rename = "Snow Showers")]
    SnowShowers,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Map a WMO weather code to a condition. Unmapped codes are `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::PartlyCloudy,
            45 | 48 => Self::Foggy,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::FreezingDrizzle,
            61 | 63 | 65 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 => Self::Snow,
            77 => Self::SnowGrains,
            80..=82 => Self::RainShowers,
            85 | 86 => Self::SnowShowers,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Foggy => "Foggy",
            Self::Drizzle => "Drizzle",
            Self::FreezingDrizzle => "Freezing Drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing Rain",
            Self::Snow => "Snow",
            Self::SnowGrains => "Snow Grains",
            Self::RainShowers => "Rain Showers",
            Self::SnowShowers => "Snow Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sunrise and sunset forecast for a city along with a friendly summary.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// City as it was requested.
    #[builder(into)]
    pub city: String,
    /// Sunrise time formatted as `yyyy-MM-ddTHH:mm:ssXXX`.
    #[serde(with = "offset_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub sunrise: DateTime<FixedOffset>,
    /// Sunset time formatted as `yyyy-MM-ddTHH:mm:ssXXX`.
    #[serde(with = "offset_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub sunset: DateTime<FixedOffset>,
    /// Short description of the day.
    #[builder(into)]
    pub enhanced_message: String,
    /// Maximum temperature in degrees Celsius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_condition: Option<WeatherCondition>,
}

/// Body returned with every non-success response.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorDetails {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub path: String,
}

#[derive(Debug, Default, Deserialize, IntoParams, Serialize)]
#[into_params(parameter_in = Query)]
pub struct SunForecastParams {
    /// Name of the city to get the forecast for, e.g. London.
    pub city: Option<String>,
}

// Java-style `XXX` offsets: whole seconds and `Z` for UTC.
mod offset_timestamp {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}
