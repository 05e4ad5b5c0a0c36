//! # Prompt dispatcher
//!
//! Sends one conversation to an OpenAI-compatible chat completions endpoint,
//! declaring the registered tools, and routes a requested tool call to the
//! matching local [`Tool`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use client::{ConsoleHandler, Dispatcher, config::ClientConfig};
//! use request::Conversation;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dispatcher = Dispatcher::builder(ClientConfig::new("sk-..."))
//!         // .tool(Box::new(MyTool))
//!         .build()?;
//!
//!     let conversation = Conversation::new(
//!         "You are a helpful assistant.",
//!         "What time is it in Beijing, China?",
//!     );
//!
//!     dispatcher
//!         .run(&conversation, &mut ConsoleHandler::stdout())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

use anyhow::{Result, anyhow, bail};
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use request::{ChatCompletionsRequest, Conversation, ToolFunction};
use response::{ChatCompletionsResponse, ErrorResponse, ModelResponse};

pub mod config;
pub mod handler;
pub mod tool;

pub use handler::{ConsoleHandler, DispatchHandler};
pub use tool::Tool;

/// How a dispatch run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Answered(String),
    ToolSucceeded { name: String, output: String },
    /// The tool ran and failed; the failure was reported to the handler only.
    ToolFailed { name: String, error: String },
    /// The model named a tool that is not registered. Nothing was run.
    UnknownTool(String),
}

pub struct Dispatcher {
    pub config: config::ClientConfig,
    http: Client,
    tools: HashMap<String, Box<dyn Tool>>,
}

pub struct DispatcherBuilder {
    config: config::ClientConfig,
    http: Option<Client>,
    tools: HashMap<String, Box<dyn Tool>>,
}

impl DispatcherBuilder {
    pub fn new(config: config::ClientConfig) -> Self {
        Self {
            config,
            http: None,
            tools: HashMap::new(),
        }
    }

    /// Shares an existing HTTP client instead of creating one.
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn tool(mut self, tool: Box<dyn Tool>) -> Self {
        let name = tool.definition().name;
        self.tools.insert(name, tool);
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        if self.config.api_key.trim().is_empty() {
            bail!("API key must not be empty");
        }

        for tool in self.tools.values() {
            tool.definition().validate()?;
        }

        Ok(Dispatcher {
            config: self.config,
            http: self.http.unwrap_or_default(),
            tools: self.tools,
        })
    }
}

impl Dispatcher {
    pub fn builder(config: config::ClientConfig) -> DispatcherBuilder {
        DispatcherBuilder::new(config)
    }

    /// Declarations of the registered tools, ordered by name.
    pub fn tool_definitions(&self) -> Vec<ToolFunction> {
        let mut definitions: Vec<ToolFunction> =
            self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn build_request(&self, conversation: &Conversation) -> ChatCompletionsRequest {
        self.tool_definitions()
            .into_iter()
            .fold(
                ChatCompletionsRequest::builder(&self.config.model_id)
                    .api_style(self.config.api_style)
                    .conversation(conversation)
                    .max_tokens(self.config.max_tokens)
                    .temperature(self.config.temperature),
                |builder, function| builder.tool(function),
            )
            .build()
    }

    /// Sends the conversation and returns the decoded response body.
    pub async fn send(&self, conversation: &Conversation) -> Result<ChatCompletionsResponse> {
        let url = self.config.chat_completions_url();
        let request = self.build_request(conversation);

        debug!(
            "Sending chat completions request to {} with model: {}, tools: {}",
            url,
            request.model,
            self.tools.len()
        );

        let mut builder = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request);
        if let Some(timeout) = self.config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!("Chat completions response status: {}", status);

        if !status.is_success() {
            let body = response.text().await?;
            match ErrorResponse::parse(&body) {
                Some(envelope) => bail!(
                    "Chat completions request failed with status {}: {}",
                    status,
                    envelope.error
                ),
                None => bail!(
                    "Chat completions request failed with status {}: {}",
                    status,
                    body
                ),
            }
        }

        Ok(response.json::<ChatCompletionsResponse>().await?)
    }

    /// Sends the conversation and acts on the reply: prints a direct answer or
    /// runs the requested tool once. The tool output is not sent back.
    pub async fn run(
        &self,
        conversation: &Conversation,
        handler: &mut dyn DispatchHandler,
    ) -> Result<DispatchOutcome> {
        let response = self.send(conversation).await?;

        if let Some(usage) = &response.usage {
            handler.on_usage(usage)?;
        }

        let message = response
            .first_message()
            .ok_or_else(|| anyhow!("Response contains no choices"))?;
        handler.on_response(message)?;

        match ModelResponse::try_from(message)? {
            ModelResponse::TextAnswer(text) => {
                info!("Model answered directly");
                handler.on_answer(&text)?;
                Ok(DispatchOutcome::Answered(text))
            }
            ModelResponse::ToolCall { name, arguments } => {
                if message.tool_call_count() > 1 {
                    warn!(
                        "Model requested {} tool calls, only {} will be considered",
                        message.tool_call_count(),
                        name
                    );
                }
                self.dispatch_tool_call(&name, &arguments, handler).await
            }
        }
    }

    async fn dispatch_tool_call(
        &self,
        name: &str,
        arguments: &str,
        handler: &mut dyn DispatchHandler,
    ) -> Result<DispatchOutcome> {
        handler.on_tool_call(name)?;

        let Some(tool) = self.tools.get(name) else {
            debug!("Ignoring call to unknown tool: {}", name);
            return Ok(DispatchOutcome::UnknownTool(name.to_string()));
        };

        let arguments = tool::parse_arguments(arguments)?;
        handler.on_tool_arguments(name, &arguments)?;

        info!("Executing tool: {}", name);
        match tool.execute(&arguments).await {
            Ok(output) => {
                handler.on_tool_result(name, &output)?;
                Ok(DispatchOutcome::ToolSucceeded {
                    name: name.to_string(),
                    output,
                })
            }
            Err(e) => {
                handler.on_tool_error(name, &e)?;
                Ok(DispatchOutcome::ToolFailed {
                    name: name.to_string(),
                    error: format!("{:#}", e),
                })
            }
        }
    }
}
