//! Manual trigger: read a rendered document from a file and send it
//! directly to the registry endpoint.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use meldgate_config::AppConfig;
use meldgate_transport::{SoapClient, parse_response};
use tracing::info;

pub async fn run(file: PathBuf, endpoint: Option<String>) -> Result<()> {
    let config = AppConfig::load()?;
    let endpoint = endpoint.or(config.soap.endpoint);

    let payload =
        std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
    info!(file = %file.display(), bytes = payload.len(), "Loaded request document");

    let client = SoapClient::new(endpoint)?;
    println!("Sending request to {}", client.endpoint());

    let started = Instant::now();
    let response = client.send(&payload).await?;
    println!("Response received in {} ms", started.elapsed().as_millis());

    let result = parse_response(&response)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
