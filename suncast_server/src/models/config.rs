use serde::Deserialize;
use std::fmt;

use crate::{models::client::HttpClientConfig, utils};

/// Identifies this service to public APIs like Nominatim, which block
/// anonymous clients.
#[derive(Clone, Debug)]
pub struct UserAgent(String);

impl Default for UserAgent {
    fn default() -> Self {
        Self("SunriseSunsetForecast/1.0".to_string())
    }
}

impl From<String> for UserAgent {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "utils::default_server_binding_addr")]
    pub bind_addr: String,
    #[serde(default, deserialize_with = "utils::deserialize_with_envsubst")]
    pub user_agent: UserAgent,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: utils::default_server_binding_addr(),
            user_agent: UserAgent::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SuncastConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub geocoding: HttpClientConfig,
    pub weather: HttpClientConfig,
    /// Narratives always use the plain template when this is left out.
    #[serde(default)]
    pub generation: Option<HttpClientConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    #[test]
    #[serial]
    fn secrets_are_substituted_from_environment() -> Result<(), serde_json::Error> {
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            std::env::set_var("SUNCAST_TEST_API_KEY", "sk-test");
            std::env::set_var("SUNCAST_TEST_CONTACT", "ops@example.com");
        }
        let config: SuncastConfig = serde_json::from_value(json!({
            "server": {"user_agent": "SunriseSunsetForecast/1.0 (${SUNCAST_TEST_CONTACT})"},
            "geocoding": {"base_url": "https://nominatim.openstreetmap.org"},
            "weather": {"base_url": "https://api.open-meteo.com"},
            "generation": {
                "base_url": "https://openrouter.ai/api/v1",
                "headers": {"Authorization": "Bearer ${SUNCAST_TEST_API_KEY}"},
                "json": {"model": "openai/gpt-oss-20b:free", "temperature": 0.7},
                "timeout_ms": 30000
            }
        }))?;
        unsafe {
            std::env::remove_var("SUNCAST_TEST_API_KEY");
            std::env::remove_var("SUNCAST_TEST_CONTACT");
        }

        assert_eq!(
            config.server.user_agent.to_string(),
            "SunriseSunsetForecast/1.0 (ops@example.com)"
        );
        let generation = config.generation.expect("generation config");
        assert_eq!(
            generation.headers.get("Authorization").map(String::as_str),
            Some("Bearer sk-test")
        );
        assert_eq!(generation.json["temperature"], json!(0.7));
        assert_eq!(generation.timeout_ms, 30000);
        Ok(())
    }

    #[test]
    fn server_and_generation_sections_are_optional() -> Result<(), serde_json::Error> {
        let config: SuncastConfig = serde_json::from_value(json!({
            "geocoding": {"base_url": "https://nominatim.openstreetmap.org"},
            "weather": {"base_url": "https://api.open-meteo.com"}
        }))?;
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.server.user_agent.to_string(), "SunriseSunsetForecast/1.0");
        assert!(config.generation.is_none());
        Ok(())
    }
}
