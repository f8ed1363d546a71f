//! rosterbot - membership-tracking IRC client bot.
//!
//! Keeps an always-consistent view of which nicks occupy which channels
//! and answers queries about it over IRC.

use std::sync::Arc;

use rosterbot::config::Config;
use rosterbot::network;
use rosterbot::state::NickRegistry;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "rosterbot.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.address,
        nick = %config.bot.nick,
        channels = config.bot.channels.len(),
        "Starting rosterbot"
    );

    let registry = Arc::new(NickRegistry::new());

    network::run(&config, registry).await
}
