use anyhow::{Result, bail};

use crate::ResponseMessage;

/// What the model asked for, decided once from the raw response message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelResponse {
    /// The model answered directly.
    TextAnswer(String),
    /// The model wants a tool run. `arguments` is the raw JSON string.
    ToolCall { name: String, arguments: String },
}

impl TryFrom<&ResponseMessage> for ModelResponse {
    type Error = anyhow::Error;

    /// Non-empty content wins; otherwise the first call from `tool_calls`
    /// or, failing that, the legacy `function_call`.
    fn try_from(message: &ResponseMessage) -> Result<Self> {
        if let Some(content) = message.content.as_deref().filter(|c| !c.is_empty()) {
            return Ok(ModelResponse::TextAnswer(content.to_string()));
        }

        let call = message
            .tool_calls
            .as_ref()
            .and_then(|calls| calls.first())
            .map(|call| &call.function)
            .or(message.function_call.as_ref());

        match call {
            Some(function) => Ok(ModelResponse::ToolCall {
                name: function.name.clone(),
                arguments: function.arguments.clone(),
            }),
            None => bail!("Response message has neither content nor a tool call"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FunctionCall, ToolCall};

    #[test]
    fn text_content_is_an_answer() {
        let message = ResponseMessage::text("It is 3:04PM in Beijing.");
        assert_eq!(
            ModelResponse::try_from(&message).unwrap(),
            ModelResponse::TextAnswer("It is 3:04PM in Beijing.".to_string())
        );
    }

    #[test]
    fn empty_content_falls_through_to_tool_call() {
        let mut message = ResponseMessage::tool_call("lookupTime", r#"{"location":"Asia/Shanghai"}"#);
        message.content = Some(String::new());

        assert_eq!(
            ModelResponse::try_from(&message).unwrap(),
            ModelResponse::ToolCall {
                name: "lookupTime".to_string(),
                arguments: r#"{"location":"Asia/Shanghai"}"#.to_string(),
            }
        );
    }

    #[test]
    fn content_takes_precedence_over_tool_call() {
        let mut message = ResponseMessage::tool_call("lookupTime", "{}");
        message.content = Some("Let me check.".to_string());

        assert_eq!(
            ModelResponse::try_from(&message).unwrap(),
            ModelResponse::TextAnswer("Let me check.".to_string())
        );
    }

    #[test]
    fn legacy_function_call_is_a_tool_call() {
        let message = ResponseMessage::function_call("lookupTime", r#"{"location":"Europe/Paris"}"#);
        assert_eq!(
            ModelResponse::try_from(&message).unwrap(),
            ModelResponse::ToolCall {
                name: "lookupTime".to_string(),
                arguments: r#"{"location":"Europe/Paris"}"#.to_string(),
            }
        );
    }

    #[test]
    fn only_first_tool_call_is_used() {
        let mut message = ResponseMessage::tool_call("lookupTime", r#"{"location":"A/B"}"#);
        if let Some(calls) = message.tool_calls.as_mut() {
            calls.push(ToolCall {
                function: FunctionCall {
                    arguments: "{}".to_string(),
                    name: "other".to_string(),
                },
                id: Some("call_1".to_string()),
                tool_type: Some("function".to_string()),
            });
        }

        match ModelResponse::try_from(&message).unwrap() {
            ModelResponse::ToolCall { name, .. } => assert_eq!(name, "lookupTime"),
            other => panic!("expected tool call, got {other:?}"),
        }
    }

    #[test]
    fn empty_message_is_an_error() {
        let message = ResponseMessage {
            role: "assistant".to_string(),
            ..Default::default()
        };
        assert!(ModelResponse::try_from(&message).is_err());
    }
}
