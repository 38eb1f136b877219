//! Client for Discord's attachment refresh endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use relink_config::DiscordConfig;

pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v9";

const REFRESH_PATH: &str = "/attachments/refresh-urls";

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to execute request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("no refreshed URL returned")]
    NoRefreshedUrl,
}

/// Something that can exchange an expired attachment URL for a freshly signed one.
#[async_trait]
pub trait AttachmentRefresher: Send + Sync {
    async fn refresh(&self, attachment_url: &str, token: &str) -> Result<String, RefreshError>;
}

#[derive(Debug, Serialize)]
struct RefreshUrlsRequest<'a> {
    attachment_urls: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
pub struct RefreshUrlsResponse {
    pub refreshed_urls: Vec<RefreshedUrl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedUrl {
    pub original: String,
    pub refreshed: String,
}

/// [`AttachmentRefresher`] backed by the Discord HTTP API.
#[derive(Debug, Clone)]
pub struct DiscordRefreshClient {
    client: Client,
    endpoint: String,
}

impl DiscordRefreshClient {
    pub fn new() -> Result<Self, RefreshError> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Client against a custom API origin, without a request timeout.
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self, RefreshError> {
        let client = Client::builder().build().map_err(RefreshError::Client)?;
        Ok(Self::from_parts(client, base_url.as_ref()))
    }

    pub fn from_config(config: &DiscordConfig) -> Result<Self, RefreshError> {
        let mut builder = Client::builder();

        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder.build().map_err(RefreshError::Client)?;
        Ok(Self::from_parts(client, &config.api_base_url))
    }

    fn from_parts(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{REFRESH_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AttachmentRefresher for DiscordRefreshClient {
    async fn refresh(&self, attachment_url: &str, token: &str) -> Result<String, RefreshError> {
        debug!(attachment_url, "requesting refreshed attachment url");

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, token)
            .json(&RefreshUrlsRequest {
                attachment_urls: [attachment_url],
            })
            .send()
            .await
            .map_err(RefreshError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RefreshError::UnexpectedStatus(status.as_u16()));
        }

        let parsed: RefreshUrlsResponse = response.json().await.map_err(RefreshError::Decode)?;

        parsed
            .refreshed_urls
            .into_iter()
            .next()
            .map(|entry| entry.refreshed)
            .ok_or(RefreshError::NoRefreshedUrl)
    }
}
