use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::utils;

#[derive(Debug, thiserror::Error)]
pub enum ModelClientError {
    #[error("failed to reach model API: {0}")]
    ApiConnection(String),
    #[error("failed to parse model API response: {0}")]
    ResponseJson(String),
    #[error("model API returned no completion")]
    EmptyCompletion,
    #[error("invalid model API request: {0}")]
    Request(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    pub choices: Vec<CompletionChoice>,
}

impl GenerationResponse {
    /// Trimmed content of the first choice, if there's any content at all.
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
    }
}

/// Connection details for one upstream API.
///
/// `headers` values support `${VAR}` environment substitution so secrets like
/// API keys don't have to live in the config file. `json` entries are merged
/// into every JSON request body sent to the API.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub base_url: String,
    #[serde(deserialize_with = "utils::deserialize_map_with_envsubst")]
    pub headers: HashMap<String, String>,
    pub params: HashMap<String, String>,
    pub json: Map<String, Value>,
    pub timeout_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            headers: HashMap::new(),
            params: HashMap::new(),
            json: Map::new(),
            timeout_ms: utils::default_timeout_ms(),
        }
    }
}

impl HttpClientConfig {
    pub fn url(&self, endpoint: &str) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        format!("{base_url}{endpoint}")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Client builder preloaded with the configured headers and timeout.
    pub fn client_builder(&self) -> Result<reqwest::ClientBuilder, Box<dyn std::error::Error>> {
        let header_map = reqwest::header::HeaderMap::try_from(&self.headers)?;
        Ok(reqwest::Client::builder()
            .default_headers(header_map)
            .timeout(self.timeout()))
    }
}
