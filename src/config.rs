use crate::fetchers::jsonp::DEFAULT_JSONP_ENDPOINT;
use crate::fetchers::relay::DEFAULT_RELAYS;
use crate::fetchers::request::DEFAULT_USER_AGENT;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScraperConfig {
    /// How pages are fetched
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    /// HTTP server settings (server binary only)
    #[serde(default)]
    pub server: ServerConfig,
}

/// Which acquisition strategies run
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionMode {
    /// Fetch the page directly and treat failure as final
    #[default]
    Direct,
    /// Direct fetch, then each relay, then the callback fallback
    Relayed,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AcquisitionConfig {
    #[serde(default)]
    pub mode: AcquisitionMode,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Relay templates, tried in order; `{url}` is replaced by the target
    #[serde(default = "default_relays")]
    pub relays: Vec<String>,
    #[serde(default)]
    pub jsonp: JsonpConfig,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            mode: AcquisitionMode::default(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            relays: default_relays(),
            jsonp: JsonpConfig::default(),
        }
    }
}

impl AcquisitionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Configuration for the callback-style last-resort relay
#[derive(Debug, Deserialize, Clone)]
pub struct JsonpConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Template with `{url}` and `{callback}` placeholders
    #[serde(default = "default_jsonp_endpoint")]
    pub endpoint: String,
    /// Seconds to wait for the callback to fire
    #[serde(default = "default_jsonp_timeout")]
    pub timeout: u64,
}

impl Default for JsonpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_jsonp_endpoint(),
            timeout: default_jsonp_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_relays() -> Vec<String> {
    DEFAULT_RELAYS.iter().map(|r| r.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_jsonp_endpoint() -> String {
    DEFAULT_JSONP_ENDPOINT.to_string()
}

fn default_jsonp_timeout() -> u64 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SCRAPER__ prefix
    /// 2. recipe-scraper.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SCRAPER__ACQUISITION__MODE=relayed
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// See [`ScraperConfig::load`]
pub fn load_config() -> Result<ScraperConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("recipe-scraper").required(false))
        // Use double underscore for nested: RECIPE_SCRAPER__SERVER__PORT
        .add_source(
            Environment::with_prefix("RECIPE_SCRAPER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
