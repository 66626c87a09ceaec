//! Configuration data models

use serde::{Deserialize, Serialize};

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Provider catalog loaded into the registry at startup
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Router settings
    #[serde(default)]
    pub router: RouterSettings,

    /// Queue settings
    #[serde(default)]
    pub queue: QueueSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS settings for the HTTP server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Whether CORS headers are emitted at all
    #[serde(default)]
    pub enabled: bool,

    /// Allowed origins; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// One provider in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique, stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Task tags this provider serves
    #[serde(default = "default_task_types")]
    pub task_types: Vec<String>,

    /// Prior belief of success, 0.0–1.0
    #[serde(default = "default_reliability")]
    pub reliability: f64,

    /// Cost per token in account currency
    #[serde(default)]
    pub cost_per_token: f64,

    /// Completion endpoint URL; providers without one cannot be invoked by
    /// the built-in HTTP invoker
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name sent to the endpoint; defaults to the provider id
    #[serde(default)]
    pub model: Option<String>,
}

/// Router settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Upper bound for a single provider attempt, in seconds
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout_secs(),
        }
    }
}

/// Queue settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Maximum number of concurrently in-flight requests
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

pub(super) fn default_task_types() -> Vec<String> {
    vec![crate::core::types::GENERAL_TASK.to_string()]
}

pub(super) fn default_reliability() -> f64 {
    0.5
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

fn default_max_in_flight() -> usize {
    4
}
