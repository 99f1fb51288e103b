mod google;
mod prompt;
mod yandex;

pub use google::GeminiProvider;
pub use prompt::{build_prompt, ANALYZE_PROMPT, RECIPES_PROMPT};
pub use yandex::YandexOcrProvider;

use crate::error::ApiError;
use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Body sent to the OCR provider
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeRequest {
    pub mime_type: String,
    pub language_codes: Vec<String>,
    pub model: String,
    /// Base64-encoded image
    pub content: String,
}

/// Text recognition service
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Get the provider name (e.g., "yandex")
    fn provider_name(&self) -> &str;

    /// Run recognition and return the provider's raw response body
    async fn recognize(&self, request: &RecognizeRequest) -> Result<Value, ApiError>;
}

/// Generative language model
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Send a prompt and return the provider's raw response body
    async fn generate(&self, prompt: &str) -> Result<Value, ApiError>;
}

/// Build an HTTP client whose requests are abandoned after `timeout`.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {e}")))
}

/// Read a provider response, turning non-2xx statuses and non-JSON bodies
/// into [`ApiError::Upstream`].
pub(crate) async fn read_json_body(
    response: reqwest::Response,
    provider: &str,
    timeout: Duration,
) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::from_transport(e, timeout.as_secs()))?;
    debug!("{} responded with {}: {}", provider, status, body);

    if !status.is_success() {
        let details = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(body);
        return Err(ApiError::Upstream {
            message: format!("{} API error ({})", provider, status.as_u16()),
            status: Some(status.as_u16()),
            details: Some(details),
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Upstream {
        message: format!("{} API returned invalid JSON", provider),
        status: Some(status.as_u16()),
        details: Some(e.to_string()),
    })
}
