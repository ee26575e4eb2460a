use serde_json::json;
use tracing::{debug, info};

use crate::{
    cache::Memo,
    error::ForecastError,
    models::{
        client::HttpClientConfig,
        config::UserAgent,
        geocoding::{Coordinates, GeocodingResult},
    },
};

/// Resolves city names to coordinates with a Nominatim-compatible search API.
#[derive(Clone)]
pub struct Geocoder {
    config: HttpClientConfig,
    client: reqwest::Client,
    cache: Memo<Coordinates>,
}

impl Geocoder {
    pub fn new(
        config: HttpClientConfig,
        user_agent: &UserAgent,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client = config
            .client_builder()?
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self {
            config,
            client,
            cache: Memo::new(),
        })
    }

    pub async fn resolve(&self, city: &str) -> Result<Coordinates, ForecastError> {
        self.cache
            .get_or_try_insert_with(city, || self.search(city))
            .await
    }

    async fn search(&self, city: &str) -> Result<Coordinates, ForecastError> {
        info!("looking up coordinates for {city}");
        let params = json!(
            {
                "q": city,
                "format": "json",
                "limit": 1
            }
        );
        let results = self
            .client
            .get(self.config.url("/search"))
            .query(&params)
            .query(&self.config.params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| ForecastError::Upstream(format!("Error getting coordinates: {err}")))?
            .json::<Vec<GeocodingResult>>()
            .await
            .map_err(|err| {
                ForecastError::Upstream(format!("Error parsing geocoding response: {err}"))
            })?;

        let most_relevant_result = results.into_iter().next().ok_or_else(|| {
            ForecastError::NotFound(format!("No coordinates found for city: {city}"))
        })?;
        let coordinates = most_relevant_result.coordinates().map_err(|err| {
            ForecastError::Upstream(format!("Error parsing geocoding response: {err}"))
        })?;
        debug!(
            "resolved {city} to ({}, {}) via {}",
            coordinates.latitude,
            coordinates.longitude,
            most_relevant_result.display_name.as_deref().unwrap_or("unnamed place")
        );
        Ok(coordinates)
    }
}
