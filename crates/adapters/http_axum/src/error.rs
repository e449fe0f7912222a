//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use huedeck_domain::error::HueDeckError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HueDeckError`] to an HTTP response with appropriate status code.
pub struct ApiError(HueDeckError);

impl From<HueDeckError> for ApiError {
    fn from(err: HueDeckError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HueDeckError::MissingConfiguration(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            HueDeckError::StaleReference(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            HueDeckError::DeviceCommandFailure(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            HueDeckError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            HueDeckError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
