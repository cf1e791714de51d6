//! HTTP relay
//!
//! Four JSON endpoints under `/api`. Every request is independent; the only
//! shared state is the planner, the image service and its cache.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info};

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};
pub use handlers::{ConfigResponse, GenerateImageRequest, GenerateScheduleRequest, HealthResponse};

use crate::config::{ApiConfig, Config};
use crate::error::PlannerError;
use crate::image::ImageService;
use crate::planner::Planner;

/// Shared relay state
#[derive(Clone)]
pub struct AppState {
    pub api: ApiConfig,
    pub planner: Arc<Planner>,
    pub images: Arc<ImageService>,
    pub rate_limit_delay: Duration,
}

impl AppState {
    /// Build state from configuration and explicit keys
    pub fn new(config: &Config, api: ApiConfig, image_api_key: &str) -> Result<Self, PlannerError> {
        debug!(provider = %api.api_provider, mock = %api.use_mock_responses, "AppState::new: called");
        Ok(Self {
            planner: Arc::new(Planner::from_config(config, api.clone())?),
            images: Arc::new(ImageService::from_config(config, image_api_key)?),
            api,
            rate_limit_delay: Duration::from_millis(config.server.rate_limit_delay_ms),
        })
    }

    /// Build state with keys read from the process environment
    pub fn from_config(config: &Config) -> Result<Self, PlannerError> {
        Self::new(config, config.api_config(), &config.image_api_key())
    }
}

/// Build the relay router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/config", get(handlers::config))
        .route("/api/generate-schedule", post(handlers::generate_schedule))
        .route("/api/generate-image", post(handlers::generate_image))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Serve the relay on an already bound listener
pub async fn run(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr().context("Failed to read listener address")?;
    info!("Relay listening on http://{}", addr);
    axum::serve(listener, router(state)).await.context("Relay server failed")
}

/// Bind the configured address and serve until shutdown
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config).context("Failed to initialise relay")?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    debug!(%addr, "serve: binding");
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    run(listener, state).await
}
