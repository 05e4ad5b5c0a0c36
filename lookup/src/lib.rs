use anyhow::{Context, Result};
use async_trait::async_trait;
use client::Tool;
use request::ToolFunction;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

pub mod clock;
pub mod world_time;

pub use clock::{LocalTime, format_clock};
pub use world_time::{WORLD_TIME_API_BASE, WorldTime, WorldTimeClient};

pub const LOOKUP_TIME: &str = "lookupTime";

#[derive(Debug, Deserialize)]
pub struct LookupTimeArgs {
    pub location: String,
}

/// Tells the current time for a time zone name such as `Asia/Shanghai`.
pub struct LookupTimeTool {
    client: WorldTimeClient,
}

impl LookupTimeTool {
    pub fn new(client: WorldTimeClient) -> Self {
        Self { client }
    }

    pub async fn lookup(&self, location: &str) -> Result<LocalTime> {
        let world_time = self.client.fetch(location).await?;
        let clock = format_clock(&world_time.datetime, location)?;
        info!("Resolved time for {}: {}", location, clock);

        Ok(LocalTime {
            location: location.to_string(),
            clock,
        })
    }
}

#[async_trait]
impl Tool for LookupTimeTool {
    fn definition(&self) -> ToolFunction {
        // The model relies on the description to decide when to call this.
        ToolFunction::builder()
            .name(LOOKUP_TIME)
            .description("get the current time in a given location")
            .parameters(json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "The location, e.g. Beijing, China. Should be timezone name like Asia/Shanghai"
                    }
                },
                "required": ["location"]
            }))
            .build()
    }

    async fn execute(&self, arguments: &Value) -> Result<String> {
        let args = LookupTimeArgs::deserialize(arguments)
            .context("lookupTime expects a string 'location' argument")?;

        Ok(self.lookup(&args.location).await?.to_string())
    }
}
