// src/config.rs
//! Unified configuration management for the recruiter console.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_FALLBACK_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub backend: BackendConfig,
    pub state_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Primary candidate for base-URL resolution.
    pub base_url: String,
    /// Local fallback probed when the primary is unreachable.
    pub fallback_url: String,
    /// Shared recruiter key forwarded in the X-Recruiter-Key header.
    /// Injected from the environment or config file, never compiled in.
    pub recruiter_key: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    fallback_url: Option<String>,
    #[serde(default)]
    recruiter_key: Option<String>,
    #[serde(default)]
    state_dir: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from `config.yaml` (when present) with
    /// environment-variable overrides. `RECRUITER_KEY` must be supplied by
    /// one of the two.
    pub fn load() -> Result<Self> {
        let file = Self::load_file()?;

        let base_url = std::env::var("RECRUITER_BASE_URL")
            .ok()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let fallback_url = file
            .fallback_url
            .unwrap_or_else(|| DEFAULT_FALLBACK_URL.to_string());

        let recruiter_key = std::env::var("RECRUITER_KEY")
            .ok()
            .or(file.recruiter_key)
            .context("RECRUITER_KEY not set (environment variable or config.yaml)")?;

        let state_dir = file.state_dir.unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".recruitdesk")
        });

        info!("Backend base URL: {}", base_url);

        Ok(Self {
            backend: BackendConfig {
                base_url,
                fallback_url,
                recruiter_key,
                timeout_seconds: 30,
            },
            state_dir,
        })
    }

    fn load_file() -> Result<ConfigFile> {
        let path = PathBuf::from("config.yaml");
        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = std::fs::read_to_string(&path).context("Failed to read config.yaml")?;
        serde_yaml::from_str(&content).context("Failed to parse config.yaml")
    }

    /// Ensure the state directory exists before anything writes into it.
    pub async fn ensure_directories(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.state_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create state directory: {}",
                    self.state_dir.display()
                )
            })?;
        Ok(())
    }
}
