use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod conversation;
pub mod message;
pub mod tool;

pub use conversation::Conversation;
pub use message::Message;
pub use tool::{CHOICE_AUTO, Tool, ToolFunction};

/// Which generation of the chat completions API the request targets.
///
/// `Tools` sends `tools` + `tool_choice`, `Functions` sends the older
/// `functions` + `function_call` pair.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiStyle {
    #[default]
    Tools,
    Functions,
}

impl FromStr for ApiStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tools" => Ok(ApiStyle::Tools),
            "functions" => Ok(ApiStyle::Functions),
            other => bail!("Unknown API style '{}', expected 'tools' or 'functions'", other),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatCompletionsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<ToolFunction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
    pub messages: Vec<Message>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

impl ChatCompletionsRequest {
    pub fn builder(model: impl Into<String>) -> ChatCompletionsRequestBuilder {
        ChatCompletionsRequestBuilder {
            model: model.into(),
            ..Default::default()
        }
    }
}

#[derive(Default)]
pub struct ChatCompletionsRequestBuilder {
    api_style: ApiStyle,
    max_tokens: Option<i32>,
    messages: Vec<Message>,
    model: String,
    temperature: Option<f32>,
    tools: Vec<ToolFunction>,
}

impl ChatCompletionsRequestBuilder {
    pub fn api_style(mut self, api_style: ApiStyle) -> Self {
        self.api_style = api_style;
        self
    }

    pub fn conversation(mut self, conversation: &Conversation) -> Self {
        self.messages.extend(conversation.messages().iter().cloned());
        self
    }

    pub fn max_tokens(mut self, max_tokens: Option<i32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn tool(mut self, function: ToolFunction) -> Self {
        self.tools.push(function);
        self
    }

    /// Builds the request. With no declared tools neither the tool list nor
    /// a choice policy is sent; otherwise the policy is always `auto`.
    pub fn build(self) -> ChatCompletionsRequest {
        let mut request = ChatCompletionsRequest {
            function_call: None,
            functions: None,
            max_tokens: self.max_tokens,
            messages: self.messages,
            model: self.model,
            temperature: self.temperature,
            tool_choice: None,
            tools: None,
        };

        if self.tools.is_empty() {
            return request;
        }

        match self.api_style {
            ApiStyle::Tools => {
                request.tools = Some(self.tools.into_iter().map(Tool::from).collect());
                request.tool_choice = Some(CHOICE_AUTO.to_string());
            }
            ApiStyle::Functions => {
                request.functions = Some(self.tools);
                request.function_call = Some(CHOICE_AUTO.to_string());
            }
        }

        request
    }
}
