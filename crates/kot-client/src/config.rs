use serde::Deserialize;

/// Kitchen API connection settings, loadable from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// API base URL, e.g. "https://api.example.com/api".
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// File holding the bearer token. The `KOT_TOKEN` env var takes precedence.
    #[serde(default)]
    pub token_path: Option<String>,
}

fn default_timeout_secs() -> u64 {
    15
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            token_path: None,
        }
    }
}
