use chrono::Local;
use suncast::ForecastResult;
use tracing::{debug, info};

use crate::{
    cache::Memo,
    error::ForecastError,
    forecaster::Forecaster,
    geocoder::Geocoder,
    models::{
        prompts::ForecastPrompt,
        weather::{DailyForecast, parse_timestamp},
    },
    narrator::Narrator,
};

/// Narratives assume a mild day when the weather API leaves out temperature.
pub const DEFAULT_TEMPERATURE_C: f64 = 20.0;

/// Chains geocoding, forecast fetching and narration into one result per city.
#[derive(Clone)]
pub struct Orchestrator {
    geocoder: Geocoder,
    forecaster: Forecaster,
    narrator: Narrator,
    cache: Memo<ForecastResult>,
}

impl Orchestrator {
    pub fn new(geocoder: Geocoder, forecaster: Forecaster, narrator: Narrator) -> Self {
        Self {
            geocoder,
            forecaster,
            narrator,
            cache: Memo::new(),
        }
    }

    pub async fn get_forecast(&self, city: &str) -> Result<ForecastResult, ForecastError> {
        if let Some(result) = self.cache.get(city) {
            debug!("serving cached forecast for {city}");
            return Ok(result);
        }
        self.cache
            .get_or_try_insert_with(city, || self.compose(city))
            .await
    }

    async fn compose(&self, city: &str) -> Result<ForecastResult, ForecastError> {
        info!("composing sun forecast for {city}");
        let coordinates = self.geocoder.resolve(city).await?;
        debug!(
            "{city} is at ({}, {})",
            coordinates.latitude, coordinates.longitude
        );
        let response = self.forecaster.fetch_daily(city).await?;
        let daily = DailyForecast::try_from(&response)?;

        let sunrise = parse_timestamp(&daily.sunrise, &Local)?;
        let sunset = parse_timestamp(&daily.sunset, &Local)?;
        let condition = daily.condition();

        let prompt = ForecastPrompt::builder()
            .location(city)
            .date(daily.date().unwrap_or_else(|| sunrise.date_naive()))
            .sunrise(sunrise.time())
            .sunset(sunset.time())
            .temperature(daily.max_temperature_c.unwrap_or(DEFAULT_TEMPERATURE_C))
            .condition(condition)
            .build();
        let narrative = self.narrator.describe(&prompt).await;

        Ok(ForecastResult::builder()
            .city(city)
            .sunrise(sunrise.fixed_offset())
            .sunset(sunset.fixed_offset())
            .enhanced_message(narrative)
            .maybe_temperature(daily.max_temperature_c)
            .weather_condition(condition)
            .build())
    }
}
