//! LLM error types

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Transport-level errors from a provider call
///
/// These are classified into user-facing kinds by
/// [`PlannerError::from_llm`](crate::error::PlannerError::from_llm).
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Received empty response from AI service")]
    EmptyResponse,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Build an API error from a non-2xx status and its body
    ///
    /// Prefers the provider's `error.message` field, then a bare `error`
    /// string, then the raw body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        debug!(%status, body_len = body.len(), "LlmError::from_response: called");
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| match &v["error"] {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Object(o) => o.get("message").and_then(|m| m.as_str()).map(str::to_string),
                _ => None,
            })
            .unwrap_or_else(|| body.trim().to_string());

        let message = if message.is_empty() {
            format!("HTTP {}", status)
        } else {
            message
        };

        LlmError::ApiError { status, message }
    }

    /// Check if this error came from a timeout (ours or reqwest's)
    pub fn is_timeout(&self) -> bool {
        match self {
            LlmError::Timeout(_) => true,
            LlmError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of the upstream response, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            LlmError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
