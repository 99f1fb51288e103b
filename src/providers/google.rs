use crate::config::GeminiConfig;
use crate::error::ApiError;
use crate::providers::{build_client, read_json_body, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl GeminiProvider {
    /// Create a new Google Gemini provider from configuration
    ///
    /// A missing API key is not an error here; requests fail with
    /// [`ApiError::Config`] until one is configured.
    pub fn new(config: &GeminiConfig) -> Result<Self, ApiError> {
        let timeout = config.timeout_duration();

        Ok(GeminiProvider {
            client: build_client(timeout)?,
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate(&self, prompt: &str) -> Result<Value, ApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Config("GEMINI_API_KEY is not configured".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("Sending prompt to Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&json!({
                "contents": [{
                    "parts": [{
                        "text": prompt
                    }]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout.as_secs()))?;

        read_json_body(response, "Gemini", self.timeout).await
    }
}
