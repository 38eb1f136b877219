//! Shared application state for the gateway

use std::fmt;
use std::sync::Arc;

use relink_config::AppConfig;
use relink_discord::{AttachmentRefresher, DiscordRefreshClient, RefreshError};

/// Immutable per-process state handed to every request.
#[derive(Clone)]
pub struct GatewayState {
    /// Credential forwarded verbatim to the refresh endpoint
    token: Arc<str>,
    /// Origin used when rebuilding canonical attachment URLs
    cdn_base_url: Arc<str>,
    refresher: Arc<dyn AttachmentRefresher>,
}

impl GatewayState {
    pub fn new(config: &AppConfig, refresher: Arc<dyn AttachmentRefresher>) -> Self {
        Self {
            token: Arc::from(config.token.as_str()),
            cdn_base_url: Arc::from(config.discord.cdn_base_url.as_str()),
            refresher,
        }
    }

    /// Build state around the real Discord client described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, RefreshError> {
        let client = DiscordRefreshClient::from_config(&config.discord)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn cdn_base_url(&self) -> &str {
        &self.cdn_base_url
    }

    pub fn refresher(&self) -> &dyn AttachmentRefresher {
        self.refresher.as_ref()
    }
}

impl fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayState")
            .field("cdn_base_url", &self.cdn_base_url)
            .finish_non_exhaustive()
    }
}
