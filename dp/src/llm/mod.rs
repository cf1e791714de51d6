//! LLM Client module for dayplanner
//!
//! Provides one completion call per planning request against either
//! OpenAI or Anthropic.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod openai;
mod timeout;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use timeout::with_timeout;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::{Provider, ResolvedLlmConfig};

/// Create an LLM client for the provider in the resolved config
pub fn create_client(config: &ResolvedLlmConfig, api_key: &str) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider {
        Provider::Anthropic => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config, api_key)?))
        }
        Provider::OpenAI => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config, api_key)?))
        }
    }
}
