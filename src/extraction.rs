//! Recovery of a JSON object from a free-text model reply.

use crate::error::ExtractionError;
use crate::model::{AnalysisResult, Mode, RecipeSet};
use serde_json::Value;

/// Pull the reply text out of a `generateContent` response body.
///
/// A provider error envelope (`{"error": {"message": ..}}`) is reported
/// before anything else. All `text` parts of the first candidate are
/// concatenated.
pub fn reply_text(response: &Value) -> Result<String, ExtractionError> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ExtractionError::UpstreamError(message));
    }

    let text: String = response["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyReply);
    }

    Ok(text)
}

/// The span from the first `{` to the last `}`.
///
/// When no `}` follows the first `{`, the rest of the text is returned so
/// that the parse step reports it as malformed.
pub fn json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    match raw.rfind('}') {
        Some(end) if end > start => Some(&raw[start..=end]),
        _ => Some(&raw[start..]),
    }
}

/// Locate and parse the JSON object embedded in a model reply.
pub fn extract_json(raw: &str) -> Result<Value, ExtractionError> {
    if raw.trim().is_empty() {
        return Err(ExtractionError::EmptyReply);
    }

    let span = json_span(raw).ok_or(ExtractionError::NoJsonFound)?;
    serde_json::from_str(span).map_err(|e| ExtractionError::MalformedJson(e.to_string()))
}

/// Check that a parsed reply deserializes into the shape requested by `mode`.
pub fn validate_shape(value: &Value, mode: Mode) -> Result<(), ExtractionError> {
    let result = match mode {
        Mode::Analyze => serde_json::from_value::<AnalysisResult>(value.clone()).map(|_| ()),
        Mode::Recipes => serde_json::from_value::<RecipeSet>(value.clone()).map(|_| ()),
    };
    result.map_err(|e| ExtractionError::SchemaMismatch(e.to_string()))
}

/// Turns model replies into JSON objects of the requested shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyNormalizer {
    strict: bool,
}

impl ReplyNormalizer {
    pub fn new(strict: bool) -> Self {
        ReplyNormalizer { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Extract the object from reply text. The parsed value is returned
    /// unchanged; in strict mode it must also match `mode`'s shape.
    pub fn normalize(&self, raw: &str, mode: Mode) -> Result<Value, ExtractionError> {
        let value = extract_json(raw)?;
        if self.strict {
            validate_shape(&value, mode)?;
        }
        Ok(value)
    }

    /// Same as [`normalize`](Self::normalize), starting from a full provider response body.
    pub fn normalize_response(&self, response: &Value, mode: Mode) -> Result<Value, ExtractionError> {
        let text = reply_text(response)?;
        self.normalize(&text, mode)
    }
}
