use crate::config::OcrConfig;
use crate::error::ApiError;
use crate::providers::{build_client, read_json_body, OcrProvider, RecognizeRequest};
use async_trait::async_trait;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Yandex Vision OCR (`recognizeText`)
pub struct YandexOcrProvider {
    client: Client,
    api_key: Option<String>,
    folder_id: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl YandexOcrProvider {
    /// Create a new OCR provider from configuration
    ///
    /// A missing API key is not an error here; requests fail with
    /// [`ApiError::Config`] until one is configured.
    pub fn new(config: &OcrConfig) -> Result<Self, ApiError> {
        let timeout = config.timeout_duration();

        Ok(YandexOcrProvider {
            client: build_client(timeout)?,
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            folder_id: config.folder_id.clone().filter(|id| !id.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl OcrProvider for YandexOcrProvider {
    fn provider_name(&self) -> &str {
        "yandex"
    }

    async fn recognize(&self, request: &RecognizeRequest) -> Result<Value, ApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Config("YANDEX_API_KEY is not configured".to_string()))?;

        let url = format!("{}/ocr/v1/recognizeText", self.base_url);
        debug!(
            "Sending OCR request ({}, model {}, {} base64 chars)",
            request.mime_type,
            request.model,
            request.content.len()
        );

        let mut builder = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Api-Key {}", api_key))
            .json(request);
        if let Some(folder_id) = &self.folder_id {
            builder = builder.header("x-folder-id", folder_id);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout.as_secs()))?;

        read_json_body(response, "OCR", self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn test_config(base_url: String) -> OcrConfig {
        OcrConfig {
            api_key: Some("test-key".to_string()),
            folder_id: Some("b1gfolder".to_string()),
            base_url,
            ..OcrConfig::default()
        }
    }

    fn test_request() -> RecognizeRequest {
        RecognizeRequest {
            mime_type: "JPEG".to_string(),
            language_codes: vec!["ru".to_string(), "en".to_string()],
            model: "page".to_string(),
            content: "aGVsbG8=".to_string(),
        }
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let value = serde_json::to_value(test_request()).unwrap();
        assert_eq!(
            value,
            json!({
                "mimeType": "JPEG",
                "languageCodes": ["ru", "en"],
                "model": "page",
                "content": "aGVsbG8="
            })
        );
    }

    #[tokio::test]
    async fn test_recognize() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/ocr/v1/recognizeText")
            .match_header("authorization", "Api-Key test-key")
            .match_header("x-folder-id", "b1gfolder")
            .match_body(Matcher::Json(serde_json::to_value(test_request()).unwrap()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result": {"textAnnotation": {"blocks": []}}}"#)
            .create_async()
            .await;

        let provider = YandexOcrProvider::new(&test_config(server.url())).unwrap();
        let body = provider.recognize(&test_request()).await.unwrap();

        assert!(body["result"]["textAnnotation"]["blocks"].is_array());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_recognize_non_success_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/ocr/v1/recognizeText")
            .with_status(401)
            .with_body("Unauthenticated")
            .create_async()
            .await;

        let provider = YandexOcrProvider::new(&test_config(server.url())).unwrap();
        let result = provider.recognize(&test_request()).await;

        match result {
            Err(ApiError::Upstream {
                status, details, ..
            }) => {
                assert_eq!(status, Some(401));
                assert_eq!(details.as_deref(), Some("Unauthenticated"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_recognize_requires_api_key() {
        let mut config = test_config("http://127.0.0.1:9".to_string());
        config.api_key = Some(String::new());

        let provider = YandexOcrProvider::new(&config).unwrap();
        let result = provider.recognize(&test_request()).await;

        assert!(matches!(result, Err(ApiError::Config(msg)) if msg.contains("YANDEX_API_KEY")));
    }
}
