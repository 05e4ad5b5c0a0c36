use request::ApiStyle;
use std::{fmt, time::Duration};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL_ID: &str = "gpt-3.5-turbo";

#[derive(Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub api_key: String,
    pub api_style: ApiStyle,
    pub max_tokens: Option<i32>,
    pub model_id: String,
    pub request_timeout: Option<Duration>,
    pub temperature: Option<f32>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: OPENAI_API_BASE.to_string(),
            api_key: api_key.into(),
            api_style: ApiStyle::default(),
            max_tokens: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            request_timeout: None,
            temperature: None,
        }
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

// Hand-written so the credential never reaches a log line.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("api_style", &self.api_style)
            .field("max_tokens", &self.max_tokens)
            .field("model_id", &self.model_id)
            .field("request_timeout", &self.request_timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_openai_defaults() {
        let config = ClientConfig::new("sk-test");
        assert_eq!(config.chat_completions_url(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(config.model_id, "gpt-3.5-turbo");
        assert_eq!(config.api_style, ApiStyle::Tools);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn chat_completions_url_trims_trailing_slash() {
        let mut config = ClientConfig::new("sk-test");
        config.api_base = "http://localhost:8080/".to_string();
        assert_eq!(config.chat_completions_url(), "http://localhost:8080/chat/completions");
    }

    #[test]
    fn debug_redacts_api_key() {
        let debug = format!("{:?}", ClientConfig::new("sk-secret"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
