use axum::{Router, middleware};
use ctrlc::set_handler;
use std::fs::File;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub mod cache;
pub mod client;
pub mod error;
pub mod forecaster;
pub mod geocoder;
pub mod models;
pub mod narrator;
pub mod orchestrator;
pub mod routes;
mod utils;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sunrise Sunset Forecast API",
        description = "Sunrise and sunset times for tomorrow with a friendly generated summary"
    ),
    tags(
        (name = "Sun Forecast", description = "APIs for getting sunrise and sunset information")
    )
)]
pub struct ApiDoc;

type BindingAddress = String;

/// Read the config file named by `SUNCAST_CONFIG_PATH`.
pub fn load_config() -> Result<models::config::SuncastConfig, Box<dyn std::error::Error>> {
    let config_path = dotenvy::var("SUNCAST_CONFIG_PATH")?;
    let config_file = File::open(config_path)?;
    let config = serde_json::from_reader(config_file)?;
    Ok(config)
}

pub fn init() -> Result<(BindingAddress, models::state::SuncastState), Box<dyn std::error::Error>>
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    let config = load_config()?;
    let binding_addr = config.server.bind_addr.clone();
    let state = models::state::SuncastState::new(config)?;
    Ok((binding_addr, state))
}

/// Full HTTP app: the forecast route, OpenAPI docs, and request tracing.
pub fn app(state: models::state::SuncastState) -> Router {
    let openapi_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::sun_forecast::router(state));
    let (router, api) = openapi_router.split_for_parts();
    let router = router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api));
    with_panic_reporting(router).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new())
            .on_response(DefaultOnResponse::new()),
    )
}

fn with_panic_reporting(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(middleware::from_fn(error::report_panics))
}
