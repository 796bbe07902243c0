//! Mapping from core errors to HTTP responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_core::CoreError;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by API handlers, rendered as `{ "error": message }`
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::Validation { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Core(e) if e.is_storage() => "Internal server error".to_string(),
            ApiError::Core(e) => e.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::Core(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Core(e) if status.is_server_error() => {
                error!(error = %e, source = ?std::error::Error::source(e), "Request failed");
            }
            ApiError::Core(CoreError::Validation { field, message }) => {
                warn!(field, reason = %message, "Rejected invalid item");
            }
            _ => {}
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
