use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::any::Any;
use suncast::ErrorDetails;
use tracing::{error, warn};

/// Failures a forecast request can end in.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ForecastError {
    /// Malformed or missing city parameter.
    #[error("{0}")]
    Validation(String),
    /// Geocoding found no match for the city.
    #[error("{0}")]
    NotFound(String),
    /// The weather API answered but left out required fields.
    #[error("{0}")]
    IncompleteUpstreamData(String),
    /// Transport, status or parse failure talking to an upstream API.
    #[error("{0}")]
    Upstream(String),
    /// Anything else, such as a panic while handling the request.
    #[error("An error occurred: {0}")]
    Internal(String),
}

impl ForecastError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::IncompleteUpstreamData(_) | Self::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A [`ForecastError`] paired with the request path it happened on.
#[derive(Debug)]
pub struct ApiError {
    error: ForecastError,
    path: String,
}

impl ApiError {
    pub fn new(error: ForecastError, path: impl Into<String>) -> Self {
        Self {
            error,
            path: path.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            error!("{} failed with {status}: {}", self.path, self.error);
        } else {
            warn!("{} failed with {status}: {}", self.path, self.error);
        }
        let details = ErrorDetails {
            timestamp: Utc::now(),
            message: self.error.to_string(),
            path: self.path,
        };
        (status, Json(details)).into_response()
    }
}

/// Panic payload text, left on the bare 500 response by [`panic_response`]
/// for [`report_panics`] to turn into [`ErrorDetails`].
#[derive(Clone, Debug)]
pub struct PanicMessage(pub String);

/// Handler for `CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };
    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(PanicMessage(message));
    response
}

/// Middleware wrapped around the panic catcher so panics get the same
/// [`ErrorDetails`] body, with the request path, as every other failure.
pub async fn report_panics(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    match response.extensions().get::<PanicMessage>().cloned() {
        Some(PanicMessage(message)) => {
            ApiError::new(ForecastError::Internal(message), path).into_response()
        }
        None => response,
    }
}
