use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Controller tuning knobs, loaded from
/// `<config-dir>/studycircle-client/config.toml` when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Route prefix identifying a group view; the segment after it is the
    /// group id.
    #[serde(default = "default_group_route_prefix")]
    pub group_route_prefix: String,

    /// Delay before announcing a completed route change, letting the new
    /// view render first.
    #[serde(default = "default_announce_delay_ms")]
    pub announce_delay_ms: u64,

    /// Default lifetime of a transient notification.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Substring that marks a failure source as our own code.
    #[serde(default = "default_own_source_marker")]
    pub own_source_marker: String,

    /// Base URL for the API health check.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_group_route_prefix() -> String {
    "/group/".into()
}

fn default_announce_delay_ms() -> u64 {
    150
}

fn default_toast_duration_ms() -> u64 {
    4000
}

fn default_own_source_marker() -> String {
    "studycircle".into()
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".into()
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            group_route_prefix: default_group_route_prefix(),
            announce_delay_ms: default_announce_delay_ms(),
            toast_duration_ms: default_toast_duration_ms(),
            own_source_marker: default_own_source_marker(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl ControllerConfig {
    pub fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("studycircle-client");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {config_dir:?}"))?;
            info!("Created config directory: {config_dir:?}");
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        debug!("Loading config from: {config_path:?}");

        if !config_path.exists() {
            debug!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {config_path:?}"))?;
        let config: ControllerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {config_path:?}"))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        let content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {config_path:?}"))?;
        Ok(())
    }
}
