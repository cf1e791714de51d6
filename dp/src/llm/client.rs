//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};
use crate::config::Provider;

/// Stateless LLM client - each call is independent
///
/// One implementation per hosted chat API. Prompt building and reply
/// parsing live outside the client so both providers share them.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Which provider this client talks to
    fn provider(&self) -> Provider;

    /// Send a single completion request
    ///
    /// Makes exactly one HTTP request; no retries.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
