use axum::{
    extract::{OriginalUri, Query, State, rejection::QueryRejection},
    response::Json,
};
use suncast::{ErrorDetails, ForecastResult, SunForecastParams};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    error::{ApiError, ForecastError},
    models::state::SuncastState,
    orchestrator::Orchestrator,
};

pub fn router(state: SuncastState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_sun_forecast))
        .with_state(state)
}

/// Check a city name is present, non-blank, and only letters, spaces and
/// hyphens.
pub fn validate_city(city: Option<&str>) -> Result<&str, ForecastError> {
    let city = city.ok_or_else(|| {
        ForecastError::Validation("Required parameter 'city' is not present".to_string())
    })?;
    if city.trim().is_empty() {
        return Err(ForecastError::Validation(
            "City name is required".to_string(),
        ));
    }
    if !city
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace() || c == '-')
    {
        return Err(ForecastError::Validation(
            "City name must contain only letters, spaces, and hyphens".to_string(),
        ));
    }
    Ok(city)
}

/// Get sunrise and sunset forecast for a city.
///
/// Returns sunrise and sunset times along with a generated description for
/// the specified city.
#[utoipa::path(
    get,
    path = "/api/sun-forecast",
    tag = "Sun Forecast",
    params(SunForecastParams),
    responses(
        (status = 200, description = "Successfully retrieved forecast", body = ForecastResult),
        (status = 400, description = "Invalid city name provided", body = ErrorDetails),
        (status = 404, description = "City not found", body = ErrorDetails),
        (status = 503, description = "An upstream API failed or returned incomplete data", body = ErrorDetails),
        (status = 500, description = "Internal server error", body = ErrorDetails)
    )
)]
#[axum::debug_handler(state = SuncastState)]
pub async fn get_sun_forecast(
    State(orchestrator): State<Orchestrator>,
    OriginalUri(uri): OriginalUri,
    params: Result<Query<SunForecastParams>, QueryRejection>,
) -> Result<Json<ForecastResult>, ApiError> {
    let path = uri.path();
    let Query(params) = params.map_err(|rejection| {
        ApiError::new(ForecastError::Validation(rejection.body_text()), path)
    })?;
    let city = validate_city(params.city.as_deref()).map_err(|err| ApiError::new(err, path))?;
    let result = orchestrator
        .get_forecast(city)
        .await
        .map_err(|err| ApiError::new(err, path))?;
    Ok(Json(result))
}
