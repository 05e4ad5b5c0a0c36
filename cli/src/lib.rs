use anyhow::Result;
use client::{DispatchHandler, DispatchOutcome, Dispatcher};
use lookup::{LookupTimeTool, WorldTimeClient};
use request::Conversation;
use tracing::info;

pub mod settings;

use settings::Settings;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const USER_PROMPT: &str = "What time is it in Beijing, China?";

/// Builds the dispatcher with the time lookup tool registered. Both share
/// one HTTP client.
pub fn build_dispatcher(settings: &Settings) -> Result<Dispatcher> {
    let http = reqwest::Client::new();

    let world_time = WorldTimeClient::new(&settings.lookup_base)
        .with_http_client(http.clone())
        .with_timeout(settings.request_timeout);

    Dispatcher::builder(settings.client_config())
        .http_client(http)
        .tool(Box::new(LookupTimeTool::new(world_time)))
        .build()
}

pub async fn run(settings: &Settings, handler: &mut dyn DispatchHandler) -> Result<DispatchOutcome> {
    let dispatcher = build_dispatcher(settings)?;
    let conversation = Conversation::new(SYSTEM_PROMPT, USER_PROMPT);

    info!("Asking {}: {}", settings.model, conversation.question());
    let outcome = dispatcher.run(&conversation, handler).await?;
    info!("Run finished: {:?}", outcome);

    Ok(outcome)
}
