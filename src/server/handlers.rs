use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AppState;
use crate::error::{ApiError, ExtractionError};
use crate::model::Mode;
use crate::ocr;
use crate::providers::{build_prompt, RecognizeRequest};

/// Body of `POST /api/ocr`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrPayload {
    pub image: Option<String>,
    pub mime_type: Option<String>,
    pub language_codes: Option<Vec<String>>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OcrResponse {
    pub text: String,
}

/// Body of `POST /api/analyze`
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzePayload {
    pub text: Option<String>,
    pub mode: Option<Mode>,
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Config(msg) => {
                error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: msg,
                        status: None,
                        details: None,
                    },
                )
            }
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    status: None,
                    details: None,
                },
            ),
            ApiError::Upstream {
                message,
                status,
                details,
            } => {
                warn!("Upstream error: {} ({:?})", message, details);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: message,
                        status,
                        details,
                    },
                )
            }
            err @ (ApiError::Network(_) | ApiError::Timeout(_)) => {
                warn!("Upstream request failed: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: "Upstream request failed".to_string(),
                        status: None,
                        details: Some(err.to_string()),
                    },
                )
            }
            ApiError::Extraction(err) => {
                warn!("Extraction failed: {}", err);
                let details = match &err {
                    ExtractionError::UpstreamError(msg)
                    | ExtractionError::MalformedJson(msg)
                    | ExtractionError::SchemaMismatch(msg) => Some(msg.clone()),
                    ExtractionError::EmptyReply | ExtractionError::NoJsonFound => None,
                };
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: err.to_string(),
                        status: None,
                        details,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
}

/// Treat a missing or blank option as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Strip an optional `data:<mime>;base64,` prefix and check the payload decodes.
fn clean_image(image: &str) -> Result<String, ApiError> {
    let image = image.trim();
    let content = match image.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| ApiError::Validation("Unsupported data URL in 'image'".to_string()))?,
        None => image,
    };

    match STANDARD.decode(content) {
        Ok(bytes) if !bytes.is_empty() => Ok(content.to_string()),
        Ok(_) => Err(ApiError::Validation("Field 'image' is empty".to_string())),
        Err(e) => Err(ApiError::Validation(format!(
            "Field 'image' is not valid base64: {e}"
        ))),
    }
}

/// `OPTIONS` on any endpoint
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/ocr`: recognize text on a base64 image
pub async fn ocr(
    State(state): State<AppState>,
    payload: Result<Json<OcrPayload>, JsonRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let Json(payload) = payload.map_err(invalid_body)?;

    let image = payload
        .image
        .as_deref()
        .filter(|image| !image.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'image' is required".to_string()))?;
    let content = clean_image(image)?;

    let defaults = &state.config.ocr;
    let request = RecognizeRequest {
        mime_type: non_blank(payload.mime_type).unwrap_or_else(|| defaults.mime_type.clone()),
        language_codes: payload
            .language_codes
            .map(|codes| {
                codes
                    .into_iter()
                    .filter(|code| !code.trim().is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|codes| !codes.is_empty())
            .unwrap_or_else(|| defaults.language_codes.clone()),
        model: non_blank(payload.model).unwrap_or_else(|| defaults.model.clone()),
        content,
    };

    let body = state.ocr.recognize(&request).await?;
    let text = ocr::normalize_response(&body);

    if text.is_empty() {
        warn!("{} recognized no text", state.ocr.provider_name());
    } else {
        info!("Recognized {} characters", text.chars().count());
    }

    Ok(Json(OcrResponse { text }))
}

/// `POST /api/analyze`: ask the model for an analysis or recipes
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzePayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(invalid_body)?;

    let text = payload
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'text' is required".to_string()))?;
    let mode = payload.mode.unwrap_or_default();

    let prompt = build_prompt(mode, text);
    let body = state.llm.generate(&prompt).await?;
    let result = state.normalizer.normalize_response(&body, mode)?;

    info!("Produced {} result with {}", mode, state.llm.provider_name());
    Ok(Json(result))
}
