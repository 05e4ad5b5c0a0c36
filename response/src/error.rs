use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Error envelope returned by OpenAI-compatible APIs on non-2xx statuses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_type {
            Some(error_type) => write!(f, "{} ({})", self.message, error_type),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for ApiError {}

impl ErrorResponse {
    /// Parses an error body, returning `None` when it is not the standard envelope.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_invalid_api_key_error() {
        let body = r#"{
            "error": {
                "message": "Incorrect API key provided: sk-xxxx.",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        }"#;

        let parsed = ErrorResponse::parse(body).unwrap();
        assert_eq!(parsed.error.code.as_deref(), Some("invalid_api_key"));
        assert_eq!(
            parsed.error.to_string(),
            "Incorrect API key provided: sk-xxxx. (invalid_request_error)"
        );
    }

    #[test]
    fn non_envelope_body_is_none() {
        assert!(ErrorResponse::parse("Bad Gateway").is_none());
        assert!(ErrorResponse::parse(r#"{"detail":"nope"}"#).is_none());
    }
}
