//! User-facing error taxonomy
//!
//! Every failure a planning or image request can hit is classified into one
//! of these kinds. The relay turns them into `{ error, details }` bodies.

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::Provider;
use crate::llm::LlmError;

/// Errors surfaced to callers of the planner, image service and relay
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{provider} API key is missing")]
    Configuration { provider: Provider },

    #[error("Invalid {provider} API key")]
    Auth { provider: Provider, message: String },

    #[error("{provider} billing issue")]
    Quota { provider: Provider, message: String },

    #[error("{provider} rate limit exceeded")]
    RateLimit { provider: Provider, message: String },

    #[error("Request to {provider} timed out")]
    Timeout { provider: Provider, after: Duration },

    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: Provider,
        status: Option<u16>,
        message: String,
    },

    #[error("Received empty response from {provider}")]
    EmptyResponse { provider: Provider },

    #[error("Failed to parse the AI response: {0}")]
    Parse(String),

    #[error("Failed to build prompt: {0}")]
    Prompt(String),

    #[error("{0}")]
    InvalidRequest(String),
}

impl PlannerError {
    /// Classify a transport error from a provider call
    ///
    /// Message keywords win over status codes, matching how providers phrase
    /// their error bodies.
    pub fn from_llm(provider: Provider, err: LlmError) -> Self {
        debug!(%provider, error = %err, "PlannerError::from_llm: called");

        if let LlmError::Timeout(after) = err {
            return PlannerError::Timeout { provider, after };
        }
        if err.is_timeout() {
            return PlannerError::Timeout {
                provider,
                after: Duration::ZERO,
            };
        }

        match err {
            LlmError::ApiError { status, message } => Self::classify_api_error(provider, status, message),
            LlmError::EmptyResponse | LlmError::InvalidResponse(_) | LlmError::Json(_) => {
                debug!("PlannerError::from_llm: empty or undecodable body");
                PlannerError::EmptyResponse { provider }
            }
            other => PlannerError::Upstream {
                provider,
                status: other.status(),
                message: other.to_string(),
            },
        }
    }

    fn classify_api_error(provider: Provider, status: u16, message: String) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("authentication") {
            debug!("classify_api_error: authentication");
            PlannerError::Auth { provider, message }
        } else if lower.contains("billing") || lower.contains("quota") {
            debug!("classify_api_error: billing/quota");
            PlannerError::Quota { provider, message }
        } else if lower.contains("rate limit") || lower.contains("rate_limit_exceeded") {
            debug!("classify_api_error: rate limit");
            PlannerError::RateLimit { provider, message }
        } else if status == 401 {
            debug!("classify_api_error: 401 without keyword");
            PlannerError::Auth { provider, message }
        } else if status == 429 {
            debug!("classify_api_error: 429 without keyword");
            PlannerError::RateLimit { provider, message }
        } else {
            debug!(%status, "classify_api_error: generic upstream error");
            PlannerError::Upstream {
                provider,
                status: Some(status),
                message,
            }
        }
    }

    /// HTTP status the relay reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PlannerError::InvalidRequest(_) => 400,
            PlannerError::Auth { .. } => 401,
            PlannerError::Quota { .. } => 402,
            PlannerError::RateLimit { .. } => 429,
            PlannerError::Timeout { .. } => 504,
            PlannerError::Configuration { .. }
            | PlannerError::Upstream { .. }
            | PlannerError::EmptyResponse { .. }
            | PlannerError::Parse(_)
            | PlannerError::Prompt(_) => 500,
        }
    }

    /// Human-readable follow-up for the `details` field
    pub fn details(&self) -> Option<String> {
        match self {
            PlannerError::Configuration { .. } => Some("Please check the environment variables".to_string()),
            PlannerError::Auth { .. } => Some("The provided API key is incorrect or has expired".to_string()),
            PlannerError::Quota { provider, .. } => Some(format!(
                "There may be an issue with your {} account quota or billing",
                provider
            )),
            PlannerError::RateLimit { provider, .. } => {
                Some(format!("Too many requests sent to {} in a short time", provider))
            }
            PlannerError::Timeout { provider, .. } => {
                Some(format!("The {} service is taking too long to respond", provider))
            }
            PlannerError::Upstream { message, .. } => Some(message.clone()),
            PlannerError::EmptyResponse { .. } => Some("The AI service returned no usable content".to_string()),
            PlannerError::Parse(_) => Some("Please try again.".to_string()),
            PlannerError::Prompt(message) => Some(message.clone()),
            PlannerError::InvalidRequest(_) => None,
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, PlannerError::RateLimit { .. })
    }
}
