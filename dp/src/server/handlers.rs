//! Route handlers for the relay

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::AppState;
use super::error::{ApiError, ErrorBody};
use crate::config::Provider;
use crate::domain::{PlannerResponse, Task};
use crate::error::PlannerError;
use crate::image::ImageResult;

const TASKS_REQUIRED: &str = "Tasks array is required and must not be empty";
const DESCRIPTION_REQUIRED: &str = "Task description is required";

#[derive(Debug, Deserialize)]
pub struct GenerateScheduleRequest {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub task_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Client-visible configuration with the key redacted
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// "configured" when a key is present, otherwise empty
    pub openai_api_key: &'static str,
    pub api_provider: Provider,
    pub use_mock_responses: bool,
}

pub async fn health() -> Json<HealthResponse> {
    debug!("health: called");
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    debug!("config: called");
    Json(ConfigResponse {
        openai_api_key: if state.api.has_key() { "configured" } else { "" },
        api_provider: state.api.api_provider,
        use_mock_responses: state.api.use_mock_responses,
    })
}

pub async fn generate_schedule(
    State(state): State<AppState>,
    payload: Result<Json<GenerateScheduleRequest>, JsonRejection>,
) -> Result<Json<PlannerResponse>, ApiError> {
    debug!("generate_schedule: called");
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e, "generate_schedule: rejected body");
        ApiError::invalid(TASKS_REQUIRED)
    })?;

    if request.tasks.is_empty() {
        return Err(ApiError::invalid(TASKS_REQUIRED));
    }
    if request.tasks.iter().any(Task::is_blank) {
        return Err(ApiError::invalid("Task descriptions cannot be empty"));
    }

    info!("Generating schedule for {} tasks", request.tasks.len());
    match state.planner.generate_schedule(&request.tasks).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err(report(&state, e).await),
    }
}

pub async fn generate_image(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<ImageResult>, ApiError> {
    debug!("generate_image: called");
    let description = payload
        .ok()
        .and_then(|Json(r)| r.task_description)
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::invalid(DESCRIPTION_REQUIRED))?;

    match state.images.generate_image(&description).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => Err(report(&state, e).await),
    }
}

pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
            details: None,
        }),
    )
}

/// Log a failed request and hold rate-limit errors for the configured delay
async fn report(state: &AppState, err: PlannerError) -> ApiError {
    warn!("Request failed: {}", err);
    if err.is_rate_limit() && !state.rate_limit_delay.is_zero() {
        debug!(delay = ?state.rate_limit_delay, "report: delaying rate-limit response");
        tokio::time::sleep(state.rate_limit_delay).await;
    }
    ApiError(err)
}
