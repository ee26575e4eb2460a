use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone,
};
use serde::Deserialize;
use suncast::WeatherCondition;

use crate::error::ForecastError;

/// Fields requested from the weather API for each forecast day.
pub const DAILY_FIELDS: &str = "sunrise,sunset,temperature_2m_max,weathercode";

// Bare local timestamps, as Open-Meteo sends them with `timezone=auto`.
const LOCAL_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// ISO-8601 with an offset, where seconds are optional.
const OFFSET_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// Parallel arrays, one element per forecast day.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Daily {
    pub time: Option<Vec<String>>,
    pub sunrise: Option<Vec<String>>,
    pub sunset: Option<Vec<String>>,
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    #[serde(alias = "weather_code")]
    pub weathercode: Option<Vec<Option<i64>>>,
}

/// Raw Open-Meteo forecast bundle.
#[derive(Clone, Debug, Deserialize)]
pub struct WeatherResponse {
    pub daily: Option<Daily>,
}

/// The single requested day picked out of a [`WeatherResponse`].
#[derive(Clone, Debug, PartialEq)]
pub struct DailyForecast {
    pub date: Option<String>,
    pub sunrise: String,
    pub sunset: String,
    pub max_temperature_c: Option<f64>,
    pub weather_code: Option<i64>,
}

impl DailyForecast {
    /// Condition for the day. A missing weather code reads as clear skies.
    pub fn condition(&self) -> WeatherCondition {
        self.weather_code
            .map_or(WeatherCondition::Clear, WeatherCondition::from_code)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
    }
}

fn first_of<T: Clone>(list: Option<&Vec<T>>) -> Option<T> {
    list.and_then(|items| items.first().cloned())
}

impl TryFrom<&WeatherResponse> for DailyForecast {
    type Error = ForecastError;

    fn try_from(response: &WeatherResponse) -> Result<Self, Self::Error> {
        let daily = response.daily.as_ref().ok_or_else(|| {
            ForecastError::IncompleteUpstreamData("No daily forecast data available".to_string())
        })?;
        let sunrise = first_of(daily.sunrise.as_ref()).ok_or_else(|| {
            ForecastError::IncompleteUpstreamData("No sunrise times available".to_string())
        })?;
        let sunset = first_of(daily.sunset.as_ref()).ok_or_else(|| {
            ForecastError::IncompleteUpstreamData("No sunset times available".to_string())
        })?;
        Ok(Self {
            date: first_of(daily.time.as_ref()),
            sunrise,
            sunset,
            max_temperature_c: first_of(daily.temperature_2m_max.as_ref()).flatten(),
            weather_code: first_of(daily.weathercode.as_ref()).flatten(),
        })
    }
}

fn parse_offset_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant);
    }
    let raw = raw
        .strip_suffix(['Z', 'z'])
        .map_or_else(|| raw.to_string(), |rest| format!("{rest}+00:00"));
    OFFSET_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&raw, format).ok())
}

/// Place a wall-clock time in `zone`.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times skipped
/// by clocks going forward are read with the offset in force before the gap,
/// which moves them forward by the length of the gap.
fn from_wall_clock<Tz: TimeZone>(naive: NaiveDateTime, zone: &Tz) -> Option<DateTime<Tz>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(time) | LocalResult::Ambiguous(time, _) => Some(time),
        LocalResult::None => {
            let before_gap = naive.checked_sub_signed(TimeDelta::days(1))?;
            let offset = zone.offset_from_local_datetime(&before_gap).earliest()?.fix();
            let utc = naive
                .checked_sub_signed(TimeDelta::seconds(offset.local_minus_utc().into()))?;
            Some(zone.from_utc_datetime(&utc))
        }
    }
}

/// Parse an upstream timestamp into `zone`.
///
/// Timestamps carrying an offset (`2023-01-01T09:00:00Z`, `2023-01-01T09:00Z`)
/// keep their instant. Bare ones (`2023-01-01T09:00:00`, `2023-01-01T09:00`)
/// are read as wall-clock time in `zone`.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, zone: &Tz) -> Result<DateTime<Tz>, ForecastError> {
    if let Some(instant) = parse_offset_timestamp(raw) {
        return Ok(instant.with_timezone(zone));
    }
    LOCAL_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| from_wall_clock(naive, zone))
        .ok_or_else(|| ForecastError::Upstream(format!("Invalid date format: {raw}")))
}
