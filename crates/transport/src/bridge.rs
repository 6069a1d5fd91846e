//! Subprocess bridge to the external JVM processing engine.
//!
//! Mirrors the manual path of the registry tooling: the rendered document
//! is written to a temp file and handed to the engine's command-line
//! trigger; the result JSON is scraped from stdout between the banner
//! output. The bridge owns a blocking external call, so it applies its own
//! timeout; the composition core has nothing to cancel.

use std::path::PathBuf;
use std::time::Duration;

use meldgate_core::error::{EngineError, Result};
use tokio::process::Command;
use tracing::{debug, warn};

/// Settings for the external engine invocation.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Root of the JVM installation; `bin/java` is resolved underneath.
    /// `None` uses `java` from the search path.
    pub java_home: Option<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub main_class: String,
    pub timeout_secs: u64,
}

pub struct EngineBridge {
    settings: EngineSettings,
}

impl EngineBridge {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Resolve the JVM binary from the configured home directory, or fall
    /// back to the search path.
    pub fn runtime(&self) -> Result<PathBuf> {
        match &self.settings.java_home {
            Some(home) => {
                let java = home.join("bin").join("java");
                if java.exists() {
                    Ok(java)
                } else {
                    Err(EngineError::RuntimeNotFound {
                        path: java.display().to_string(),
                    }
                    .into())
                }
            }
            None => Ok(PathBuf::from("java")),
        }
    }

    /// Run the engine on a rendered document and return its JSON result.
    pub async fn invoke(&self, document: &str) -> Result<serde_json::Value> {
        let java = self.runtime()?;
        let input = tempfile::Builder::new()
            .prefix("meldgate-")
            .suffix(".xml")
            .tempfile()
            .map_err(|e| EngineError::Io(e.to_string()))?;
        std::fs::write(input.path(), document).map_err(|e| EngineError::Io(e.to_string()))?;

        let classpath = join_classpath(&self.settings.classpath);
        debug!(
            runtime = %java.display(),
            main_class = %self.settings.main_class,
            "Invoking external engine"
        );

        let output = tokio::time::timeout(
            Duration::from_secs(self.settings.timeout_secs),
            Command::new(&java)
                .arg("-cp")
                .arg(&classpath)
                .arg(&self.settings.main_class)
                .arg(input.path())
                .output(),
        )
        .await
        .map_err(|_| EngineError::Timeout {
            timeout_secs: self.settings.timeout_secs,
        })?
        .map_err(|e| EngineError::Spawn(e.to_string()))?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(exit_code = code, "External engine failed");
            return Err(EngineError::NonZeroExit { code, stderr }.into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let json = extract_json(&stdout).ok_or(EngineError::NoPayload)?;
        Ok(serde_json::from_str(json)?)
    }
}

fn join_classpath(entries: &[PathBuf]) -> String {
    let separator = if cfg!(target_os = "windows") { ";" } else { ":" };
    entries
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// The engine prints banners around the result; take the substring between
/// the first `{` and the last `}`.
fn extract_json(output: &str) -> Option<&str> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&output[start..=end])
}
