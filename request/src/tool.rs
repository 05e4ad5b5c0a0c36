use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: ToolFunction,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ToolFunction {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Value,
}

/// Choice policy sent as both `tool_choice` and the legacy `function_call`.
pub const CHOICE_AUTO: &str = "auto";

impl From<ToolFunction> for Tool {
    fn from(function: ToolFunction) -> Self {
        Tool {
            tool_type: "function".to_string(),
            function,
        }
    }
}

impl ToolFunction {
    pub fn builder() -> ToolFunctionBuilder {
        ToolFunctionBuilder::default()
    }

    /// Names listed under `required` in the parameter schema.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|required| required.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Checks that the parameter schema is an object schema whose required
    /// names all appear under `properties`.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Tool function name must not be empty");
        }

        if self.parameters.get("type").and_then(Value::as_str) != Some("object") {
            bail!("Parameters of '{}' must be an object schema", self.name);
        }

        let properties = self
            .parameters
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| anyhow!("Parameters of '{}' have no properties", self.name))?;

        for required in self.required_parameters() {
            if !properties.contains_key(required) {
                bail!(
                    "Required parameter '{}' of '{}' is not declared in properties",
                    required,
                    self.name
                );
            }
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct ToolFunctionBuilder {
    description: Option<String>,
    name: String,
    parameters: Option<Value>,
}

impl ToolFunctionBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn build(self) -> ToolFunction {
        ToolFunction {
            name: self.name,
            description: self.description,
            parameters: self.parameters.unwrap_or_else(|| {
                serde_json::json!({ "type": "object", "properties": {}, "required": [] })
            }),
        }
    }
}
