//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::queue::RequestQueue;
use crate::core::registry::ProviderRegistry;
use crate::monitoring::usage::UsageLogger;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All core components are constructed once at startup and passed in by
/// reference; there are no module-level singletons, so tests can build a
/// fresh state per case.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Provider catalog
    pub registry: Arc<ProviderRegistry>,
    /// Admission queue in front of the router
    pub queue: Arc<RequestQueue>,
    /// Attempt log and derived metrics
    pub usage: UsageLogger,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(
        config: Config,
        registry: Arc<ProviderRegistry>,
        queue: Arc<RequestQueue>,
        usage: UsageLogger,
    ) -> Self {
        Self {
            config: Arc::new(config),
            registry,
            queue,
            usage,
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
