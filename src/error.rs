use thiserror::Error;

/// Failures while turning a language-model reply into a JSON object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The model returned no text at all
    #[error("Model returned an empty reply")]
    EmptyReply,

    /// The provider answered with its own error envelope
    #[error("Provider error: {0}")]
    UpstreamError(String),

    /// No `{` in the reply
    #[error("No JSON object found in model reply")]
    NoJsonFound,

    /// The `{ .. }` span did not parse
    #[error("Malformed JSON in model reply: {0}")]
    MalformedJson(String),

    /// Parsed JSON does not have the requested shape (strict mode only)
    #[error("Model reply does not match the expected shape: {0}")]
    SchemaMismatch(String),
}

/// Errors surfaced by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// A server-side credential or setting is missing
    #[error("Server configuration error: {0}")]
    Config(String),

    /// The client sent a missing or malformed field
    #[error("{0}")]
    Validation(String),

    /// The provider answered with a non-2xx status
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<u16>,
        details: Option<String>,
    },

    /// Transport failure talking to a provider
    #[error("Network error: {0}")]
    Network(String),

    /// The provider did not answer within the configured deadline
    #[error("Upstream request timed out after {0}s")]
    Timeout(u64),

    /// The model reply could not be turned into the expected object
    #[error("Failed to extract structured result: {0}")]
    Extraction(#[from] ExtractionError),
}

impl ApiError {
    /// Classify a transport error, separating deadline expiry from other failures.
    ///
    /// The request URL is dropped from the message: it may carry an API key.
    pub fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout_secs)
        } else {
            ApiError::Network(err.without_url().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_messages() {
        assert_eq!(
            ExtractionError::NoJsonFound.to_string(),
            "No JSON object found in model reply"
        );
        assert!(ExtractionError::MalformedJson("EOF while parsing".into())
            .to_string()
            .contains("EOF while parsing"));
    }

    #[test]
    fn test_extraction_error_converts_into_api_error() {
        let err: ApiError = ExtractionError::EmptyReply.into();
        assert!(matches!(err, ApiError::Extraction(ExtractionError::EmptyReply)));
        assert!(err.to_string().contains("empty reply"));
    }

    #[test]
    fn test_upstream_displays_message_only() {
        let err = ApiError::Upstream {
            message: "OCR provider returned 403".to_string(),
            status: Some(403),
            details: Some("permission denied".to_string()),
        };
        assert_eq!(err.to_string(), "OCR provider returned 403");
    }
}
