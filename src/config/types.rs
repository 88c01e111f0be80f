use serde::Deserialize;

/// Default pause between monitoring cycles (milliseconds)
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

/// Default `User-Agent` header sent with every storefront request
pub const DEFAULT_USER_AGENT: &str = "request";

/// Default location of the target store file
pub const DEFAULT_STORE_PATH: &str = "sites.json";

/// Main configuration structure for Storefront-Watch
///
/// Every section is optional; a missing file or section falls back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Monitoring loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Fixed pause after each cycle (milliseconds)
    #[serde(rename = "interval-ms", default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Value of the `User-Agent` header
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds. Absent means no timeout.
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Target store location
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON store file
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_store_path() -> String {
    DEFAULT_STORE_PATH.to_string()
}
