use tracing::{debug, warn};

use crate::{client::ModelClient, models::prompts::ForecastPrompt};

/// Phrases forecast facts into a short narrative.
///
/// Prefers the language model and quietly falls back to a fixed template on
/// any model failure, so describing a forecast never fails.
#[derive(Clone)]
pub struct Narrator {
    model_client: Option<ModelClient>,
}

impl Narrator {
    pub fn new(model_client: Option<ModelClient>) -> Self {
        Self { model_client }
    }

    pub async fn describe(&self, prompt: &ForecastPrompt) -> String {
        let Some(model_client) = &self.model_client else {
            debug!("no generation API configured");
            return prompt.fallback();
        };
        debug!("generating narrative for {}", prompt.location);
        match model_client.generate(prompt.to_generation_request()).await {
            Ok(narrative) => narrative,
            Err(err) => {
                warn!("falling back to templated narrative: {err}");
                prompt.fallback()
            }
        }
    }
}
