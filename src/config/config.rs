// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the workshop extraction backend
    pub backend_api_url: String,

    /// Working directory where the transient archive is downloaded
    pub download_dir: PathBuf,

    /// Number of status checks before giving up with "server busy"
    pub poll_max_attempts: u32,

    /// Seconds to wait between status checks
    pub poll_interval_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("WORKSHOP_DL_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut config: Config = if std::path::Path::new(&config_path).exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            // Use default configuration
            Config::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from an explicit TOML file path
    ///
    /// Unlike `load`, a missing file is an error here since the path was
    /// requested explicitly. Environment overrides still apply.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(val) = std::env::var("WORKSHOP_DL_BACKEND_API_URL") {
            self.backend_api_url = val;
        }
        if let Ok(val) = std::env::var("WORKSHOP_DL_DOWNLOAD_DIR") {
            self.download_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("WORKSHOP_DL_POLL_MAX_ATTEMPTS") {
            self.poll_max_attempts = val.parse()?;
        }
        if let Ok(val) = std::env::var("WORKSHOP_DL_POLL_INTERVAL_SECS") {
            self.poll_interval_secs = val.parse()?;
        }
        if let Ok(val) = std::env::var("WORKSHOP_DL_LOG_LEVEL") {
            self.log_level = val;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_api_url: String::from("https://backend-02-prd.steamworkshopdownloader.io"),
            download_dir: PathBuf::from("."),
            poll_max_attempts: 10,
            poll_interval_secs: 3,
            log_level: String::from("info"),
        }
    }
}
