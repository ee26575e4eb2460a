use serde_json::json;
use tracing::info;

use crate::{
    cache::Memo,
    error::ForecastError,
    geocoder::Geocoder,
    models::{
        client::HttpClientConfig,
        weather::{DAILY_FIELDS, WeatherResponse},
    },
};

/// Fetches a one-day forecast bundle from an Open-Meteo-compatible API.
#[derive(Clone)]
pub struct Forecaster {
    config: HttpClientConfig,
    client: reqwest::Client,
    geocoder: Geocoder,
    cache: Memo<WeatherResponse>,
}

impl Forecaster {
    pub fn new(
        config: HttpClientConfig,
        geocoder: Geocoder,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client = config.client_builder()?.build()?;
        Ok(Self {
            config,
            client,
            geocoder,
            cache: Memo::new(),
        })
    }

    pub async fn fetch_daily(&self, city: &str) -> Result<WeatherResponse, ForecastError> {
        self.cache
            .get_or_try_insert_with(city, || self.fetch(city))
            .await
    }

    async fn fetch(&self, city: &str) -> Result<WeatherResponse, ForecastError> {
        let coordinates = self.geocoder.resolve(city).await?;
        info!(
            "fetching forecast for {city} at ({}, {})",
            coordinates.latitude, coordinates.longitude
        );

        // Only tomorrow's forecast is ever needed, so one day is requested.
        let params = json!(
            {
                "latitude": coordinates.latitude,
                "longitude": coordinates.longitude,
                "daily": DAILY_FIELDS,
                "timezone": "auto",
                "forecast_days": 1,
                "temperature_unit": "celsius",
                "windspeed_unit": "kmh",
                "precipitation_unit": "mm"
            }
        );
        self.client
            .get(self.config.url("/v1/forecast"))
            .query(&params)
            .query(&self.config.params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| ForecastError::Upstream(format!("Error fetching weather data: {err}")))?
            .json::<WeatherResponse>()
            .await
            .map_err(|err| ForecastError::Upstream(format!("Error processing weather data: {err}")))
    }
}
