use anyhow::Result;
use async_trait::async_trait;
use request::ToolFunction;
use serde_json::Value;

/// A local capability the model may ask to run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declaration sent to the model. Its `name` is the dispatch key.
    fn definition(&self) -> ToolFunction;

    /// Runs the tool with the already-parsed arguments object.
    async fn execute(&self, arguments: &Value) -> Result<String>;
}

/// Parses a raw tool-call argument string. An empty string means no arguments.
pub fn parse_arguments(arguments: &str) -> Result<Value> {
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };

    Ok(serde_json::from_str(arguments)?)
}
