//! Configuration management for the Gateway
//!
//! This module handles loading and validation of all gateway configuration.

pub mod models;

pub use models::*;

use crate::utils::error::{GatewayError, Result};
use std::collections::{BTreeMap, HashSet};
use std::env;
use std::path::Path;
use tracing::{debug, info, warn};

/// Main configuration struct for the Gateway
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let gateway: GatewayConfig = serde_yaml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { gateway };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Starts from defaults, applies `GATEWAY_*` overrides, and reads the
    /// provider catalog from `PROVIDER_<ID>_<FIELD>` variables (for example
    /// `PROVIDER_OPENAI_ENDPOINT`). Ids are lowercased; providers are ordered
    /// by id so registration order is reproducible across restarts.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut gateway = GatewayConfig::default();

        if let Ok(host) = env::var("GATEWAY_HOST") {
            gateway.server.host = host;
        }
        if let Ok(port) = env::var("GATEWAY_PORT") {
            gateway.server.port = port
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid GATEWAY_PORT: {}", e)))?;
        }
        if let Ok(timeout) = env::var("GATEWAY_ATTEMPT_TIMEOUT_SECS") {
            gateway.router.attempt_timeout_secs = timeout.parse().map_err(|e| {
                GatewayError::Config(format!("Invalid GATEWAY_ATTEMPT_TIMEOUT_SECS: {}", e))
            })?;
        }
        if let Ok(max_in_flight) = env::var("GATEWAY_MAX_IN_FLIGHT") {
            gateway.queue.max_in_flight = max_in_flight
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid GATEWAY_MAX_IN_FLIGHT: {}", e)))?;
        }

        gateway.providers = providers_from_env();

        let config = Self { gateway };
        config.validate()?;

        debug!("Configuration loaded from environment variables");
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    /// Get providers configuration
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.gateway.providers
    }

    /// Get router settings
    pub fn router(&self) -> &RouterSettings {
        &self.gateway.router
    }

    /// Get queue settings
    pub fn queue(&self) -> &QueueSettings {
        &self.gateway.queue
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if self.gateway.router.attempt_timeout_secs == 0 {
            return Err(GatewayError::config(
                "router.attempt_timeout_secs must be at least 1",
            ));
        }

        if self.gateway.queue.max_in_flight == 0 {
            return Err(GatewayError::config("queue.max_in_flight must be at least 1"));
        }

        let mut seen = HashSet::new();
        for provider in &self.gateway.providers {
            if provider.id.is_empty() {
                return Err(GatewayError::config("provider id must not be empty"));
            }
            if !seen.insert(provider.id.as_str()) {
                return Err(GatewayError::Config(format!(
                    "duplicate provider id: {}",
                    provider.id
                )));
            }
            if !(0.0..=1.0).contains(&provider.reliability) {
                return Err(GatewayError::Config(format!(
                    "provider {}: reliability must be within 0.0..=1.0",
                    provider.id
                )));
            }
            if provider.cost_per_token < 0.0 {
                return Err(GatewayError::Config(format!(
                    "provider {}: cost_per_token must not be negative",
                    provider.id
                )));
            }
            if provider.task_types.is_empty() {
                return Err(GatewayError::Config(format!(
                    "provider {}: task_types must not be empty",
                    provider.id
                )));
            }
            if provider.endpoint.is_none() {
                warn!(
                    provider = %provider.id,
                    "no endpoint configured; provider cannot be invoked over HTTP"
                );
            }
        }

        debug!("Configuration validation completed");
        Ok(())
    }
}

/// Collect provider definitions from `PROVIDER_<ID>_<FIELD>` variables
///
/// Recognized fields: `NAME`, `TASK_TYPES` (comma-separated), `RELIABILITY`,
/// `COST_PER_TOKEN`, `ENDPOINT`, `API_KEY`, `MODEL`. Unparseable numeric
/// fields fall back to their defaults. Ids containing underscores cannot be
/// expressed in this format.
fn providers_from_env() -> Vec<ProviderConfig> {
    let mut fields_by_id: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

    for (key, value) in env::vars() {
        let Some(rest) = key.strip_prefix("PROVIDER_") else {
            continue;
        };
        let Some((id, field)) = rest.split_once('_') else {
            continue;
        };
        fields_by_id
            .entry(id.to_lowercase())
            .or_default()
            .insert(field.to_lowercase(), value);
    }

    let providers: Vec<ProviderConfig> = fields_by_id
        .into_iter()
        .map(|(id, fields)| ProviderConfig {
            name: fields.get("name").cloned().unwrap_or_else(|| id.clone()),
            task_types: fields
                .get("task_types")
                .map(|t| t.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(models::default_task_types),
            reliability: fields
                .get("reliability")
                .and_then(|r| r.parse().ok())
                .unwrap_or_else(models::default_reliability),
            cost_per_token: fields
                .get("cost_per_token")
                .and_then(|c| c.parse().ok())
                .unwrap_or(0.0),
            endpoint: fields.get("endpoint").cloned(),
            api_key: fields.get("api_key").cloned(),
            model: fields.get("model").cloned(),
            id,
        })
        .collect();

    if providers.is_empty() {
        debug!("No providers configured in environment variables");
    } else {
        debug!("Loaded {} providers from environment", providers.len());
    }
    providers
}
