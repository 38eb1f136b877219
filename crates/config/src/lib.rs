use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "relink.toml",
    "config/relink.toml",
    "crates/config/relink.toml",
];

/// Bare variables honoured for compatibility with existing deployments.
const TOKEN_VAR: &str = "TOKEN";
const PORT_VAR: &str = "PORT";

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Discord credential, sent verbatim as the `Authorization` header.
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };

        f.debug_struct("AppConfig")
            .field("token", &token)
            .field("http", &self.http)
            .field("discord", &self.discord)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Upstream Discord endpoints used when refreshing attachment links.
///
/// ```
/// use relink_config::DiscordConfig;
///
/// let discord = DiscordConfig::default();
/// assert_eq!(discord.api_base_url, "https://discord.com/api/v9");
/// assert_eq!(discord.cdn_base_url, "https://cdn.discordapp.com");
/// assert!(discord.request_timeout_seconds.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default = "DiscordConfig::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "DiscordConfig::default_cdn_base_url")]
    pub cdn_base_url: String,
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl DiscordConfig {
    fn default_api_base_url() -> String {
        "https://discord.com/api/v9".to_string()
    }

    fn default_cdn_base_url() -> String {
        "https://cdn.discordapp.com".to_string()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            cdn_base_url: Self::default_cdn_base_url(),
            request_timeout_seconds: None,
            user_agent: None,
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// The bare `TOKEN` and `PORT` variables take precedence over everything else.
///
/// ```
/// use relink_config::load;
///
/// std::env::remove_var("RELINK_CONFIG");
/// std::env::set_var("TOKEN", "example-token");
///
/// let config = load().expect("configuration should load once a token is present");
/// assert_eq!(config.token, "example-token");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("discord.api_base_url", defaults.discord.api_base_url.clone())?
        .set_default("discord.cdn_base_url", defaults.discord.cdn_base_url.clone())?;

    let environment_overrides = config::Environment::with_prefix("RELINK").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("RELINK_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via RELINK_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder
        .add_source(environment_overrides)
        .set_override_option("token", bare_var(TOKEN_VAR))?
        .set_override_option("http.port", bare_var(PORT_VAR))?;

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.token.is_empty() {
        anyhow::bail!("missing token: set {TOKEN_VAR} or RELINK__TOKEN");
    }

    debug!(?config, "loaded relink configuration");
    Ok(config)
}

/// Empty values count as unset.
fn bare_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
