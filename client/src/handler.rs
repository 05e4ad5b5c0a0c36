use anyhow::Result;
use response::{ResponseMessage, Usage};
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, error};

/// Receives each observable step of a dispatch run.
pub trait DispatchHandler {
    /// The raw assistant message, before it is classified.
    fn on_response(&mut self, message: &ResponseMessage) -> Result<()>;

    fn on_answer(&mut self, text: &str) -> Result<()>;

    /// A tool call was requested, known or not.
    fn on_tool_call(&mut self, name: &str) -> Result<()>;

    fn on_tool_arguments(&mut self, name: &str, arguments: &Value) -> Result<()>;

    fn on_tool_result(&mut self, name: &str, result: &str) -> Result<()>;

    fn on_tool_error(&mut self, name: &str, error: &anyhow::Error) -> Result<()>;

    fn on_usage(&mut self, usage: &Usage) -> Result<()>;
}

/// Writes the run to a line-oriented sink; tool failures go to the log only.
///
/// A direct answer shows up twice: inside the pretty-printed message from
/// `on_response`, then again as a bare line from `on_answer`.
pub struct ConsoleHandler<W: Write> {
    out: W,
}

impl ConsoleHandler<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleHandler<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DispatchHandler for ConsoleHandler<W> {
    fn on_response(&mut self, message: &ResponseMessage) -> Result<()> {
        writeln!(self.out, "{}", serde_json::to_string_pretty(message)?)?;
        Ok(())
    }

    fn on_answer(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn on_tool_call(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "functionCallName: {}", name)?;
        Ok(())
    }

    fn on_tool_arguments(&mut self, _name: &str, arguments: &Value) -> Result<()> {
        writeln!(self.out, "completionArguments: {}", arguments)?;
        Ok(())
    }

    fn on_tool_result(&mut self, _name: &str, result: &str) -> Result<()> {
        writeln!(self.out, "{}", result)?;
        self.out.flush()?;
        Ok(())
    }

    fn on_tool_error(&mut self, name: &str, error: &anyhow::Error) -> Result<()> {
        error!("Tool {} failed: {:#}", name, error);
        Ok(())
    }

    fn on_usage(&mut self, usage: &Usage) -> Result<()> {
        debug!(
            "Usage: prompt_tokens: {}, completion_tokens: {}, total_tokens: {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(handler: ConsoleHandler<Vec<u8>>) -> String {
        String::from_utf8(handler.into_inner()).unwrap()
    }

    #[test]
    fn tool_call_lines_match_console_format() {
        let mut handler = ConsoleHandler::new(Vec::new());
        handler.on_tool_call("lookupTime").unwrap();
        handler
            .on_tool_arguments("lookupTime", &serde_json::json!({"location": "Asia/Shanghai"}))
            .unwrap();

        assert_eq!(
            output(handler),
            "functionCallName: lookupTime\ncompletionArguments: {\"location\":\"Asia/Shanghai\"}\n"
        );
    }

    #[test]
    fn tool_error_writes_nothing_to_output() {
        let mut handler = ConsoleHandler::new(Vec::new());
        handler
            .on_tool_error("lookupTime", &anyhow::anyhow!("404 Not Found"))
            .unwrap();

        assert!(output(handler).is_empty());
    }

    #[test]
    fn response_is_printed_as_json() {
        let mut handler = ConsoleHandler::new(Vec::new());
        handler.on_response(&ResponseMessage::text("hello")).unwrap();

        let printed = output(handler);
        let parsed: Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(parsed["content"], "hello");
        assert_eq!(parsed["role"], "assistant");
    }

    #[test]
    fn direct_answer_appears_in_message_and_on_its_own_line() {
        let mut handler = ConsoleHandler::new(Vec::new());
        handler.on_response(&ResponseMessage::text("It is 3:04PM.")).unwrap();
        handler.on_answer("It is 3:04PM.").unwrap();

        let printed = output(handler);
        assert_eq!(printed.matches("It is 3:04PM.").count(), 2);
        assert!(printed.ends_with("\nIt is 3:04PM.\n"));
    }
}
