use serde::{Deserialize, Serialize};

pub mod error;
pub mod model_response;

pub use error::{ApiError, ErrorResponse};
pub use model_response::ModelResponse;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatCompletionsResponse {
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: i32,
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ToolCall {
    pub function: FunctionCall,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FunctionCall {
    #[serde(default)]
    pub arguments: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub completion_tokens: i32,
    #[serde(default)]
    pub prompt_tokens: i32,
    #[serde(default)]
    pub total_tokens: i32,
}

impl ChatCompletionsResponse {
    pub fn builder() -> ChatCompletionsResponseBuilder {
        ChatCompletionsResponseBuilder::default()
    }

    pub fn first_message(&self) -> Option<&ResponseMessage> {
        self.choices.first().map(|choice| &choice.message)
    }
}

impl ResponseMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            role: "assistant".to_string(),
            ..Default::default()
        }
    }

    pub fn tool_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            tool_calls: Some(vec![ToolCall {
                function: FunctionCall {
                    arguments: arguments.into(),
                    name: name.into(),
                },
                id: Some("call_0".to_string()),
                tool_type: Some("function".to_string()),
            }]),
            ..Default::default()
        }
    }

    /// A legacy functions API reply, with the call under `function_call`.
    pub fn function_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            function_call: Some(FunctionCall {
                arguments: arguments.into(),
                name: name.into(),
            }),
            role: "assistant".to_string(),
            ..Default::default()
        }
    }

    /// Number of tool calls carried by this message, in either API shape.
    pub fn tool_call_count(&self) -> usize {
        self.tool_calls.as_ref().map_or(0, Vec::len) + usize::from(self.function_call.is_some())
    }
}

#[derive(Default)]
pub struct ChatCompletionsResponseBuilder {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

impl ChatCompletionsResponseBuilder {
    pub fn choice(mut self, message: ResponseMessage, finish_reason: Option<&str>) -> Self {
        let index = self.choices.len() as i32;
        self.choices.push(Choice {
            finish_reason: finish_reason.map(str::to_string),
            index,
            message,
        });
        self
    }

    pub fn usage(mut self, usage: Option<Usage>) -> Self {
        self.usage = usage;
        self
    }

    pub fn build(self) -> ChatCompletionsResponse {
        ChatCompletionsResponse {
            choices: self.choices,
            created: None,
            id: None,
            model: None,
            object: Some("chat.completion".to_string()),
            usage: self.usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_indexes_choices_in_order() {
        let response = ChatCompletionsResponse::builder()
            .choice(ResponseMessage::text("first"), Some("stop"))
            .choice(ResponseMessage::text("second"), None)
            .build();

        assert_eq!(response.choices[0].index, 0);
        assert_eq!(response.choices[1].index, 1);
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            response.first_message().and_then(|m| m.content.as_deref()),
            Some("first")
        );
    }

    #[test]
    fn tool_call_message_serializes_null_content() {
        let message = ResponseMessage::tool_call("lookupTime", r#"{"location":"Asia/Shanghai"}"#);
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], json!(null));
        assert_eq!(json["tool_calls"][0]["type"], "function");
        assert_eq!(json["tool_calls"][0]["function"]["name"], "lookupTime");
        assert!(json.get("function_call").is_none());
    }

    #[test]
    fn tool_call_count_covers_both_shapes() {
        assert_eq!(ResponseMessage::text("hi").tool_call_count(), 0);
        assert_eq!(ResponseMessage::tool_call("a", "{}").tool_call_count(), 1);
        assert_eq!(ResponseMessage::function_call("a", "{}").tool_call_count(), 1);
    }
}
