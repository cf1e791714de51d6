//! Image generation clients

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ImageConfig;
use crate::llm::LlmError;

/// Stateless image client - one request per call, no retries
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Generate one image and return its URL
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// OpenAI Images API client
pub struct OpenAIImageClient {
    model: String,
    api_key: String,
    base_url: String,
    size: String,
    quality: String,
    style: String,
    http: Client,
}

impl OpenAIImageClient {
    pub fn from_config(config: &ImageConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "OpenAIImageClient::from_config: called");
        let http = Client::builder().build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            size: config.size.clone(),
            quality: config.quality.clone(),
            style: config.style.clone(),
            http,
        })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": self.size,
            "quality": self.quality,
            "style": self.style,
        })
    }
}

#[async_trait]
impl ImageClient for OpenAIImageClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(%self.model, prompt_len = prompt.len(), "OpenAIImageClient::generate: called");
        let url = format!("{}/v1/images/generations", self.base_url);

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&self.build_request_body(prompt))
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "OpenAIImageClient::generate: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_response(status, &text));
        }

        let text = response.text().await?;
        let api_response: ImagesResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to decode image response: {}", e)))?;

        api_response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|u| !u.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}
