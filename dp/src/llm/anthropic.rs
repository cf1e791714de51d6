//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, StopReason, TokenUsage};
use crate::config::{Provider, ResolvedLlmConfig};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Create a new client from resolved configuration and a key
    pub fn from_config(config: &ResolvedLlmConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let http = Client::builder().build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: api_key.into(),
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the Anthropic API
    ///
    /// The system prompt travels in the top-level `system` field; `messages`
    /// carries only the conversation turns. Sampling parameters are not sent.
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "messages": self.convert_messages(&request.messages),
        });

        if let Some(system) = &request.system_prompt {
            body["system"] = serde_json::json!(system);
        }

        if request.temperature.is_some() {
            debug!("build_request_body: temperature not forwarded");
        }

        body
    }

    fn convert_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role,
                    "content": msg.content,
                })
            })
            .collect()
    }

    /// Parse the Anthropic API response
    fn parse_response(&self, api_response: AnthropicResponse) -> Result<CompletionResponse, LlmError> {
        debug!(?api_response.stop_reason, "parse_response: called");
        let content = api_response.content.into_iter().find_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text),
            AnthropicContentBlock::Other => None,
        });

        let response = CompletionResponse {
            content,
            stop_reason: api_response
                .stop_reason
                .as_deref()
                .map(StopReason::from_anthropic)
                .unwrap_or(StopReason::EndTurn),
            usage: api_response
                .usage
                .map(|u| TokenUsage {
                    input_tokens: u.input_tokens,
                    output_tokens: u.output_tokens,
                })
                .unwrap_or_default(),
        };

        if response.non_empty_content().is_none() {
            debug!("parse_response: no text block");
            return Err(LlmError::EmptyResponse);
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(url)
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_response(status, &text));
        }

        let text = response.text().await?;
        let api_response: AnthropicResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to decode Anthropic response: {}", e)))?;

        debug!("complete: success");
        self.parse_response(api_response)
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> AnthropicClient {
        AnthropicClient {
            model: "claude-3-opus-20240229".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            http: Client::new(),
            max_tokens: 800,
        }
    }

    #[test]
    fn test_build_request_body_single_user_message() {
        let client = test_client();
        let request = CompletionRequest::single_turn(None, "Given these tasks", 800);

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "claude-3-opus-20240229");
        assert_eq!(body["max_tokens"], 800);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Given these tasks");
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_build_request_body_system_is_top_level() {
        let client = test_client();
        let request = CompletionRequest::single_turn(Some("Be brief".to_string()), "Plan", 2000);
        let body = client.build_request_body(&request);
        assert_eq!(body["system"], "Be brief");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["max_tokens"], 800);
    }

    #[test]
    fn test_build_request_body_omits_temperature() {
        let client = test_client();
        let request = CompletionRequest::single_turn(Some("sys".to_string()), "Plan", 800).with_temperature(0.7);
        let body = client.build_request_body(&request);
        assert!(body.get("temperature").is_none());
        assert_eq!(body["system"], "sys");
    }

    #[test]
    fn test_parse_response_first_text_block() {
        let client = test_client();
        let raw = r#"{"content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"SCHEDULE:\n9:00 AM: Gym"}],"stop_reason":"end_turn","usage":{"input_tokens":3,"output_tokens":4}}"#;
        let parsed: AnthropicResponse = serde_json::from_str(raw).unwrap();
        let response = client.parse_response(parsed).unwrap();
        assert_eq!(response.content.as_deref(), Some("SCHEDULE:\n9:00 AM: Gym"));
        assert_eq!(response.usage.output_tokens, 4);
    }

    #[test]
    fn test_parse_response_empty_content() {
        let client = test_client();
        let parsed: AnthropicResponse = serde_json::from_str(r#"{"content":[],"stop_reason":"end_turn"}"#).unwrap();
        assert!(matches!(client.parse_response(parsed), Err(LlmError::EmptyResponse)));
    }
}
