//! Configuration loading and management.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server connection configuration.
    pub server: ServerConfig,
    /// Bot identity and channel configuration.
    pub bot: BotConfig,
}

/// Server connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to connect to, host:port (e.g. "irc.libera.chat:6667").
    pub address: String,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Nickname to register with.
    pub nick: String,
    /// Username for the USER command. Defaults to the nickname.
    pub user: Option<String>,
    /// Realname for the USER command.
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Channels to join once registered.
    #[serde(default)]
    pub channels: Vec<String>,
}

fn default_realname() -> String {
    "rosterbot".to_string()
}

impl BotConfig {
    /// Username to register with: the configured one, or the nickname.
    pub fn username(&self) -> &str {
        self.user.as_deref().unwrap_or(&self.nick)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}
