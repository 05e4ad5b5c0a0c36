use anyhow::{Result, bail};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const WORLD_TIME_API_BASE: &str = "http://worldtimeapi.org/api";

/// Body of `GET /timezone/{location}`. Only `datetime` is read; other
/// fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WorldTime {
    pub datetime: String,
}

#[derive(Debug, Clone)]
pub struct WorldTimeClient {
    base_url: String,
    http: Client,
    timeout: Option<Duration>,
}

impl Default for WorldTimeClient {
    fn default() -> Self {
        Self::new(WORLD_TIME_API_BASE)
    }
}

impl WorldTimeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
            timeout: None,
        }
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The location is appended as-is; `Asia/Shanghai` spans two path segments.
    pub fn timezone_url(&self, location: &str) -> String {
        format!("{}/timezone/{}", self.base_url.trim_end_matches('/'), location)
    }

    pub async fn fetch(&self, location: &str) -> Result<WorldTime> {
        let url = self.timezone_url(location);
        debug!("Looking up time zone at {}", url);

        let mut request = self.http.get(&url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "Time zone lookup for {} failed with status {}: {}",
                location,
                status,
                body.trim()
            );
        }

        Ok(response.json::<WorldTime>().await?)
    }
}
