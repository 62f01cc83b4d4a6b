//! Kitchen monitor configuration, loadable from TOML.

use std::time::Duration;

use serde::Deserialize;

use kot_client::ClientConfig;

use crate::engine::EngineSettings;

/// Top-level configuration for the kitchen monitor.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Kitchen API connection settings.
    pub api: ClientConfig,
    /// Auto-refresh interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Whether auto-refresh starts enabled.
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
    /// Warn while the server reports failed prints.
    #[serde(default = "default_true")]
    pub print_warnings: bool,
    /// Warn only when the failed-print count changes instead of on every poll.
    #[serde(default)]
    pub dedupe_print_warnings: bool,
    /// Ring the terminal bell for new orders.
    #[serde(default = "default_true")]
    pub bell: bool,
}

fn default_poll_interval() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl MonitorConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Auto-refresh interval, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            print_warnings: self.print_warnings,
            dedupe_print_warnings: self.dedupe_print_warnings,
        }
    }
}
