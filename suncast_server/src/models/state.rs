use axum::extract::FromRef;

use crate::{
    client::ModelClient, forecaster::Forecaster, geocoder::Geocoder,
    models::config::SuncastConfig, narrator::Narrator, orchestrator::Orchestrator,
};

#[derive(Clone)]
pub struct SuncastState {
    pub orchestrator: Orchestrator,
}

impl SuncastState {
    /// Wire up every upstream client from config. The geocoder is shared so
    /// its cache serves both the orchestrator and the forecaster.
    pub fn new(config: SuncastConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let SuncastConfig {
            server,
            geocoding,
            weather,
            generation,
        } = config;
        let geocoder = Geocoder::new(geocoding, &server.user_agent)?;
        let forecaster = Forecaster::new(weather, geocoder.clone())?;
        let model_client = generation.map(ModelClient::new).transpose()?;
        let narrator = Narrator::new(model_client);
        Ok(Self {
            orchestrator: Orchestrator::new(geocoder, forecaster, narrator),
        })
    }
}

impl FromRef<SuncastState> for Orchestrator {
    fn from_ref(state: &SuncastState) -> Orchestrator {
        state.orchestrator.clone()
    }
}
