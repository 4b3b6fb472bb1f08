//! LINE Messaging API reply client

use super::{LineError, OutboundMessage};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Channel credentials and endpoint configuration
#[derive(Debug, Clone)]
pub struct LineConfig {
    pub channel_access_token: String,
    pub api_base: String,
}

impl LineConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://api.line.me";

    pub fn new(channel_access_token: impl Into<String>) -> Self {
        Self {
            channel_access_token: channel_access_token.into(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Read configuration from the environment.
    ///
    /// Returns `None` when `LINE_CHANNEL_ACCESS_TOKEN` is unset or blank.
    /// `LINE_API_BASE` overrides the endpoint for tests and proxies.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("LINE_CHANNEL_ACCESS_TOKEN").ok()?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        let config = Self::new(token);
        match std::env::var("LINE_API_BASE") {
            Ok(base) if !base.trim().is_empty() => Some(config.with_api_base(base.trim())),
            _ => Some(config),
        }
    }
}

/// HTTP client for the reply endpoint
pub struct LineClient {
    client: Client,
    channel_access_token: String,
    reply_url: String,
}

impl LineClient {
    pub fn new(config: LineConfig) -> Self {
        let reply_url = format!(
            "{}/v2/bot/message/reply",
            config.api_base.trim_end_matches('/')
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            channel_access_token: config.channel_access_token,
            reply_url,
        }
    }

    /// Send reply messages against a single-use reply token.
    ///
    /// Failures are returned classified but are never retried here: by
    /// the time an error comes back the token is almost always burned.
    pub async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), LineError> {
        let request = ReplyRequest {
            reply_token,
            messages,
        };

        let response = self
            .client
            .post(&self.reply_url)
            .bearer_auth(&self.channel_access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LineError::network(format!("Request timeout: {}", e))
                } else if e.is_connect() {
                    LineError::network(format!("Connection failed: {}", e))
                } else {
                    LineError::unknown(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(|e| LineError::network(format!("Failed to read response: {}", e)))?;

        Err(classify_error(status, &body))
    }
}

fn classify_error(status: reqwest::StatusCode, body: &str) -> LineError {
    match status.as_u16() {
        401 | 403 => LineError::auth(format!("Authentication failed: {}", body)),
        429 => LineError::rate_limit(format!("Rate limited: {}", body)),
        400 => LineError::invalid_request(format!("Invalid request: {}", body)),
        500..=599 => LineError::server_error(format!("Server error: {}", body)),
        _ => LineError::unknown(format!("HTTP {}: {}", status, body)),
    }
}

// LINE Messaging API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [OutboundMessage],
}
