//! Relay error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::debug;

use crate::error::PlannerError;

/// JSON error body: `{ error, details? }`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A planner error on its way out of the relay
#[derive(Debug)]
pub struct ApiError(pub PlannerError);

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self(PlannerError::InvalidRequest(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(%status, error = %self.0, "ApiError::into_response: called");
        let body = ErrorBody {
            error: self.0.to_string(),
            details: self.0.details(),
        };
        (status, Json(body)).into_response()
    }
}
