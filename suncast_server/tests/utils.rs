#![allow(dead_code)]

use reqwest::Response;
use serde_json::{Value, json};
use suncast_server::models::{config::SuncastConfig, state::SuncastState};
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

pub const USER_AGENT: &str = "SunriseSunsetForecastTest/1.0";
pub const MODEL: &str = "test-model";

pub async fn assert_ok_response(response: Response) -> Result<Response, String> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let body = response.text().await.map_err(|err| format!("{err:?}"))?;
        Err(body)
    }
}

/// Fake geocoding, weather and model APIs for one test.
pub struct Upstreams {
    pub geocoding: MockServer,
    pub weather: MockServer,
    pub generation: MockServer,
}

impl Upstreams {
    pub async fn start() -> Self {
        Self {
            geocoding: MockServer::start().await,
            weather: MockServer::start().await,
            generation: MockServer::start().await,
        }
    }

    pub fn generation_config(&self, timeout_ms: u64) -> Value {
        json!(
            {
                "base_url": self.generation.uri(),
                "headers": {"Authorization": "Bearer test-key"},
                "json": {"model": MODEL, "temperature": 0.7, "max_tokens": 500},
                "timeout_ms": timeout_ms
            }
        )
    }

    pub fn config(&self, generation: Option<Value>) -> Result<SuncastConfig, serde_json::Error> {
        serde_json::from_value(json!(
            {
                "server": {"user_agent": USER_AGENT},
                "geocoding": {"base_url": self.geocoding.uri(), "timeout_ms": 2000},
                "weather": {"base_url": self.weather.uri(), "timeout_ms": 2000},
                "generation": generation
            }
        ))
    }

    pub async fn mount_geocoding(&self, city: &str, response: ResponseTemplate, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", city))
            .and(query_param("format", "json"))
            .and(query_param("limit", "1"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(response)
            .expect(calls)
            .mount(&self.geocoding)
            .await;
    }

    pub async fn mount_weather(&self, response: ResponseTemplate, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("forecast_days", "1"))
            .and(query_param("timezone", "auto"))
            .and(query_param("temperature_unit", "celsius"))
            .and(query_param(
                "daily",
                "sunrise,sunset,temperature_2m_max,weathercode",
            ))
            .respond_with(response)
            .expect(calls)
            .mount(&self.weather)
            .await;
    }

    pub async fn mount_generation(&self, response: ResponseTemplate, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(response)
            .expect(calls)
            .mount(&self.generation)
            .await;
    }

    pub async fn verify(&self) {
        self.geocoding.verify().await;
        self.weather.verify().await;
        self.generation.verify().await;
    }
}

pub fn geocoding_hit(lat: &str, lon: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([
        {
            "place_id": 1,
            "lat": lat,
            "lon": lon,
            "display_name": "Somewhere"
        }
    ]))
}

pub fn weather_day(sunrise: &str, sunset: &str, temperature: Value, code: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!(
        {
            "latitude": 51.5,
            "longitude": -0.12,
            "timezone": "Europe/London",
            "daily_units": {"time": "iso8601", "sunrise": "iso8601"},
            "daily": {
                "time": [&sunrise[..10]],
                "sunrise": [sunrise],
                "sunset": [sunset],
                "temperature_2m_max": temperature,
                "weathercode": code
            }
        }
    ))
}

pub fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!(
        {
            "id": "gen-1",
            "model": MODEL,
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": content}}
            ]
        }
    ))
}

/// Serve the full app on an ephemeral port and return its base URL.
pub async fn spawn_app(config: SuncastConfig) -> Result<String, Box<dyn std::error::Error>> {
    let state = SuncastState::new(config)?;
    let router = suncast_server::app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, router).await });
    Ok(format!("http://{addr}"))
}
