//! Server assembly and the run_server entry point
//!
//! Wires configuration into concrete components: registry, HTTP invoker,
//! usage logger, router, and queue, then hands the shared state to the HTTP
//! server.

use crate::config::Config;
use crate::core::invoker::{HttpInvoker, InvocationTarget};
use crate::core::queue::{QueueConfig, RequestQueue};
use crate::core::registry::{ProviderRegistry, ProviderSpec};
use crate::core::router::{Router, RouterConfig};
use crate::monitoring::usage::UsageLogger;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Build the shared application state from configuration
pub fn build_state(config: Config) -> AppState {
    let registry = Arc::new(ProviderRegistry::new());
    let mut invoker = HttpInvoker::new();

    for provider in config.providers() {
        registry.register(ProviderSpec {
            id: provider.id.clone(),
            name: provider.name.clone(),
            task_types: provider.task_types.clone(),
            reliability: provider.reliability,
            cost_per_token: provider.cost_per_token,
        });

        match &provider.endpoint {
            Some(endpoint) => {
                invoker = invoker.with_target(
                    provider.id.clone(),
                    InvocationTarget {
                        endpoint: endpoint.clone(),
                        api_key: provider.api_key.clone(),
                        model: provider
                            .model
                            .clone()
                            .unwrap_or_else(|| provider.id.clone()),
                    },
                );
                info!("Registered provider: {}", provider.id);
            }
            None => {
                warn!(
                    "Provider {} has no endpoint and will fail when attempted",
                    provider.id
                );
            }
        }
    }

    if registry.is_empty() {
        warn!("No providers configured; every request will fail candidate selection");
    }

    let usage = UsageLogger::new();
    let router = Arc::new(Router::new(
        Arc::clone(&registry),
        Arc::new(invoker),
        usage.clone(),
        RouterConfig {
            attempt_timeout: Duration::from_secs(config.router().attempt_timeout_secs),
        },
    ));
    let queue = Arc::new(RequestQueue::start(
        router,
        QueueConfig {
            max_in_flight: config.queue().max_in_flight,
        },
    ));

    AppState::new(config, registry, queue, usage)
}

/// Run the server, loading configuration from `config_path`
///
/// A missing or unreadable configuration file falls back to defaults so the
/// gateway still comes up for local experimentation.
pub async fn run_server(config_path: &str) -> Result<()> {
    info!("Starting MultiLLM Gateway");
    info!("Loading configuration file: {}", config_path);

    let config = match Config::from_file(config_path).await {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "Configuration file loading failed, falling back to environment: {}",
                e
            );
            Config::from_env()?
        }
    };

    let bind_host = config.server().host.clone();
    let bind_port = config.server().port;

    let server = HttpServer::new(config)?;
    info!("Server starting at: http://{}:{}", bind_host, bind_port);
    info!("API Endpoints:");
    info!("   POST /route            - Route a completion request");
    info!("   GET  /providers/stats  - Provider availability snapshot");
    info!("   GET  /metrics/models   - Per-provider usage statistics");
    info!("   GET  /metrics/fallbacks - Fallback metrics");
    info!("   GET  /metrics/cost     - Cost metrics");
    info!("   GET  /metrics/recent   - Recent attempt records");
    info!("   GET  /health           - Health check");

    server.start().await
}
