//! Start the HTTP gateway.

use anyhow::{Result, anyhow};
use meldgate_config::AppConfig;

pub async fn run(port: Option<u16>) -> Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(port) = port {
        config.gateway.port = port;
    }
    meldgate_gateway::start(config)
        .await
        .map_err(|e| anyhow!("{e}"))
}
