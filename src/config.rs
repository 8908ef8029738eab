use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Hard ceiling on rows returned by a single search.
pub const MAX_RESULT_LIMIT: u32 = 1000;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:55555".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
        }
    }
}

fn default_result_limit() -> u32 {
    MAX_RESULT_LIMIT
}

/// Thumbnail service settings. Thumbnails live at
/// `{base_url}/thumbnail/{collection}/obj/{id}`.
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    #[serde(default = "default_media_enabled")]
    pub enabled: bool,
    #[serde(default = "default_media_base_url")]
    pub base_url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            enabled: default_media_enabled(),
            base_url: default_media_base_url(),
            collection: default_collection(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_media_enabled() -> bool {
    true
}
fn default_media_base_url() -> String {
    "https://media.collections.yale.edu".to_string()
}
fn default_collection() -> String {
    "yuag".to_string()
}
fn default_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Returns the bind address with its port replaced by `port`.
    pub fn bind_with_port(&self, port: u16) -> Result<SocketAddr> {
        let mut addr: SocketAddr = self
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;
        addr.set_port(port);
        Ok(addr)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.search.result_limit == 0 || config.search.result_limit > MAX_RESULT_LIMIT {
        anyhow::bail!("search.result_limit must be in 1..={}", MAX_RESULT_LIMIT);
    }

    if config.media.timeout_secs == 0 {
        anyhow::bail!("media.timeout_secs must be > 0");
    }

    if config.media.enabled && config.media.base_url.trim().is_empty() {
        anyhow::bail!("media.base_url must be set when media is enabled");
    }

    config
        .server
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("server.bind is not a socket address: {}", config.server.bind))?;

    Ok(())
}
