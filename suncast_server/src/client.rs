use serde::{Serialize, de::DeserializeOwned};

use crate::models::client::{
    GenerationRequest, GenerationResponse, HttpClientConfig, ModelClientError,
};

/// Client for an OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct ModelClient {
    config: HttpClientConfig,
    client: reqwest::Client,
}

impl ModelClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let client = config.client_builder()?.build()?;
        Ok(Self { config, client })
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<String, ModelClientError> {
        let response: GenerationResponse = self.post("/chat/completions", request).await?;
        response
            .into_content()
            .ok_or(ModelClientError::EmptyCompletion)
    }

    async fn post<Request: Serialize, ResponseModel: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: Request,
    ) -> Result<ResponseModel, ModelClientError> {
        let url = self.config.url(endpoint);
        let mut value = serde_json::to_value(request)
            .map_err(|err| ModelClientError::Request(err.to_string()))?;
        // Sampling parameters, model name, etc. come from the config.
        value
            .as_object_mut()
            .ok_or_else(|| ModelClientError::Request("body must be a JSON object".to_string()))?
            .extend(self.config.json.clone());
        self.client
            .post(url)
            .query(&self.config.params)
            .json(&value)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| ModelClientError::ApiConnection(err.to_string()))?
            .json::<ResponseModel>()
            .await
            .map_err(|err| ModelClientError::ResponseJson(err.to_string()))
    }
}
