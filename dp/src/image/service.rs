//! Task image service
//!
//! Wraps an [`ImageClient`] with prompt building, the request deadline,
//! mock mode and the placeholder fallback.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::cache::ImageCache;
use super::category::{Category, fallback_image_url};
use super::client::{ImageClient, OpenAIImageClient};
use crate::config::{Config, Provider};
use crate::error::PlannerError;
use crate::llm::with_timeout;
use crate::prompts::{ImagePromptContext, PromptLoader};

/// Description used when the caller passes a blank one
const BLANK_DESCRIPTION: &str = "Task";

/// Result of one image request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub image_url: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_mock: bool,
}

impl ImageResult {
    pub fn mock(description: &str) -> Self {
        Self {
            image_url: fallback_image_url(description),
            is_mock: true,
        }
    }
}

/// Generates and caches one illustrative image per task
pub struct ImageService {
    /// `None` when no image API key is configured
    client: Option<Arc<dyn ImageClient>>,
    prompts: PromptLoader,
    use_mock_images: bool,
    timeout: Duration,
    cache: ImageCache,
}

impl ImageService {
    pub fn new(
        client: Option<Arc<dyn ImageClient>>,
        prompts: PromptLoader,
        use_mock_images: bool,
        timeout: Duration,
    ) -> Self {
        debug!(has_client = client.is_some(), %use_mock_images, ?timeout, "ImageService::new: called");
        Self {
            client,
            prompts,
            use_mock_images,
            timeout,
            cache: ImageCache::new(),
        }
    }

    /// Build the service from configuration and an image API key
    ///
    /// An empty key leaves the service without a client; requests then
    /// report a configuration error.
    pub fn from_config(config: &Config, api_key: &str) -> Result<Self, PlannerError> {
        debug!(has_key = !api_key.is_empty(), "ImageService::from_config: called");
        let client: Option<Arc<dyn ImageClient>> = if api_key.is_empty() || config.mock.images {
            None
        } else {
            let client = OpenAIImageClient::from_config(&config.image, api_key)
                .map_err(|e| PlannerError::from_llm(Provider::OpenAI, e))?;
            Some(Arc::new(client) as Arc<dyn ImageClient>)
        };

        Ok(Self::new(
            client,
            PromptLoader::new(config.prompts_dir.as_ref()),
            config.mock.images,
            Duration::from_millis(config.image.timeout_ms),
        ))
    }

    pub fn is_mock(&self) -> bool {
        self.use_mock_images
    }

    /// Generate an image for one task, surfacing every failure
    pub async fn generate_image(&self, description: &str) -> Result<ImageResult, PlannerError> {
        debug!(%description, "ImageService::generate_image: called");
        let description = description.trim();
        if description.is_empty() {
            return Err(PlannerError::InvalidRequest("Task description is required".to_string()));
        }

        if self.use_mock_images {
            debug!("ImageService::generate_image: mock mode");
            return Ok(ImageResult::mock(description));
        }

        let Some(client) = &self.client else {
            debug!("ImageService::generate_image: no client configured");
            return Err(PlannerError::Configuration {
                provider: Provider::OpenAI,
            });
        };

        let context = ImagePromptContext {
            description: description.to_string(),
            concept: Category::for_description(description).concept().map(str::to_string),
        };
        let prompt = self.prompts.image_prompt(&context)?;

        info!("Requesting image for task '{}'", description);
        let image_url = with_timeout(self.timeout, client.generate(&prompt))
            .await
            .map_err(|e| PlannerError::from_llm(Provider::OpenAI, e))?;

        Ok(ImageResult {
            image_url,
            is_mock: false,
        })
    }

    /// Image URL for a task; never fails
    ///
    /// Results are cached by normalised description. Any failure yields the
    /// category placeholder, which is cached too.
    pub async fn get_task_image(&self, description: &str) -> String {
        debug!(%description, "ImageService::get_task_image: called");
        if description.trim().is_empty() {
            return fallback_image_url(BLANK_DESCRIPTION);
        }

        let key = ImageCache::normalize(description);
        let cell = self.cache.cell(&key);
        cell.get_or_init(|| async {
            match self.generate_image(description).await {
                Ok(result) if result.is_mock => fallback_image_url(description),
                Ok(result) => result.image_url,
                Err(e) => {
                    warn!("Image generation failed for '{}': {}. Using fallback.", description, e);
                    fallback_image_url(description)
                }
            }
        })
        .await
        .clone()
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }
}
