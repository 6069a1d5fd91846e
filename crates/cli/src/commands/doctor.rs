//! Diagnose configuration and external runtime health.

use anyhow::Result;
use meldgate_transport::{DEFAULT_ENDPOINT, EngineBridge, EngineSettings};

use meldgate_config::AppConfig;

pub fn run() -> Result<()> {
    println!("meldgate doctor\n");

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("[ok]   configuration loaded");
            config
        }
        Err(e) => {
            println!("[fail] configuration: {e}");
            return Ok(());
        }
    };

    let endpoint = config.soap.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        println!("[ok]   endpoint: {endpoint}");
    } else {
        println!("[warn] endpoint does not look like an HTTP URL: {endpoint}");
    }

    match config.backend.as_str() {
        "soap" => println!("[ok]   backend: soap"),
        "bridge" => {
            let bridge = EngineBridge::new(EngineSettings {
                java_home: config.engine.java_home.clone(),
                classpath: config.engine.classpath.clone(),
                main_class: config.engine.main_class.clone(),
                timeout_secs: config.engine.timeout_secs,
            });
            match bridge.runtime() {
                Ok(path) => println!("[ok]   external runtime: {}", path.display()),
                Err(e) => println!("[fail] external runtime: {e}"),
            }
        }
        other => println!("[warn] backend '{other}': /search disabled"),
    }

    Ok(())
}
