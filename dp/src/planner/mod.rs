//! Schedule planning
//!
//! Either generates a mock schedule locally or makes exactly one call to the
//! selected provider, then parses the reply.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

pub mod mock;
pub mod parser;

pub use mock::generate_mock_schedule;
pub use parser::{ScheduleParser, parse_response};

use crate::config::{ApiConfig, Config, Provider};
use crate::domain::{PlannerResponse, Task};
use crate::error::PlannerError;
use crate::image::ImageService;
use crate::llm::{CompletionRequest, LlmClient, StopReason, create_client, with_timeout};
use crate::prompts::PromptLoader;

/// Sampling temperature for schedule requests
const SCHEDULE_TEMPERATURE: f32 = 0.7;

/// Plans a day from a task list
pub struct Planner {
    api: ApiConfig,
    /// `None` in mock mode or when no key is configured
    client: Option<Arc<dyn LlmClient>>,
    prompts: PromptLoader,
    parser: ScheduleParser,
    timeout: Duration,
    max_tokens: u32,
    mock_seed: Option<u64>,
}

impl Planner {
    /// Build a planner from configuration and the request-time API view
    pub fn from_config(config: &Config, api: ApiConfig) -> Result<Self, PlannerError> {
        debug!(provider = %api.api_provider, mock = %api.use_mock_responses, "Planner::from_config: called");
        let resolved = config.llm.resolve_for(api.api_provider);

        let client = if api.use_mock_responses || !api.has_key() {
            debug!("Planner::from_config: no provider client");
            None
        } else {
            Some(create_client(&resolved, &api.api_key).map_err(|e| PlannerError::from_llm(api.api_provider, e))?)
        };

        Ok(Self {
            api,
            client,
            prompts: PromptLoader::new(config.prompts_dir.as_ref()),
            parser: ScheduleParser::new()?,
            timeout: Duration::from_millis(resolved.timeout_ms),
            max_tokens: resolved.max_tokens,
            mock_seed: config.mock.seed,
        })
    }

    /// Build a planner around an existing client
    pub fn with_client(
        api: ApiConfig,
        client: Arc<dyn LlmClient>,
        prompts: PromptLoader,
        timeout: Duration,
    ) -> Result<Self, PlannerError> {
        debug!(provider = %api.api_provider, ?timeout, "Planner::with_client: called");
        Ok(Self {
            api,
            client: Some(client),
            prompts,
            parser: ScheduleParser::new()?,
            timeout,
            max_tokens: 800,
            mock_seed: None,
        })
    }

    /// Fix the mock generator's seed
    pub fn with_mock_seed(mut self, seed: u64) -> Self {
        self.mock_seed = Some(seed);
        self
    }

    pub fn provider(&self) -> Provider {
        self.api.api_provider
    }

    pub fn is_mock(&self) -> bool {
        self.api.use_mock_responses
    }

    /// Generate a schedule for the given tasks
    pub async fn generate_schedule(&self, tasks: &[Task]) -> Result<PlannerResponse, PlannerError> {
        debug!(task_count = %tasks.len(), "Planner::generate_schedule: called");
        if tasks.is_empty() {
            return Err(PlannerError::InvalidRequest(
                "No tasks provided. Please add at least one task.".to_string(),
            ));
        }

        if self.api.use_mock_responses {
            info!("Using mock schedule for {} tasks", tasks.len());
            return Ok(self.mock_schedule(tasks));
        }

        let provider = self.api.api_provider;
        let Some(client) = &self.client else {
            debug!(%provider, "Planner::generate_schedule: missing API key");
            return Err(PlannerError::Configuration { provider });
        };

        let prompt = self.prompts.schedule_prompt(tasks)?;
        let request = CompletionRequest::single_turn(
            Some(self.prompts.schedule_system_prompt().to_string()),
            prompt,
            self.max_tokens,
        )
        .with_temperature(SCHEDULE_TEMPERATURE);

        info!("Requesting schedule from {} for {} tasks", provider, tasks.len());
        let response = with_timeout(self.timeout, client.complete(request))
            .await
            .map_err(|e| PlannerError::from_llm(provider, e))?;

        info!(
            "{} usage: input_tokens={} output_tokens={}",
            provider, response.usage.input_tokens, response.usage.output_tokens
        );
        if response.stop_reason == StopReason::MaxTokens {
            warn!("{} reply was truncated at the token limit", provider);
        }

        let text = response
            .non_empty_content()
            .ok_or(PlannerError::EmptyResponse { provider })?;
        let parsed = self.parser.parse(text);
        debug!(items = %parsed.schedule.len(), "Planner::generate_schedule: parsed reply");
        Ok(parsed)
    }

    fn mock_schedule(&self, tasks: &[Task]) -> PlannerResponse {
        match self.mock_seed {
            Some(seed) => generate_mock_schedule(tasks, &mut StdRng::seed_from_u64(seed)),
            None => generate_mock_schedule(tasks, &mut rand::rng()),
        }
    }

    /// Fill in `image_url` for every schedule item
    ///
    /// Images are fetched concurrently and matched back by description.
    pub async fn attach_images(&self, response: &mut PlannerResponse, images: &ImageService) {
        let descriptions = response.descriptions();
        debug!(count = %descriptions.len(), "Planner::attach_images: called");

        let urls = join_all(descriptions.iter().map(|d| images.get_task_image(d))).await;
        let by_description: HashMap<&str, String> = descriptions.iter().map(String::as_str).zip(urls).collect();

        for item in &mut response.schedule {
            item.image_url = by_description.get(item.task_description.as_str()).cloned();
        }
    }
}
