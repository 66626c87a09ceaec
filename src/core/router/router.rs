//! Router core structure

use crate::core::invoker::ProviderInvocation;
use crate::core::registry::ProviderRegistry;
use crate::monitoring::usage::UsageLogger;
use std::sync::Arc;
use std::time::Duration;

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Upper bound for a single provider attempt
    pub attempt_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

/// The request router
///
/// Owns no mutable state of its own: provider health lives in the registry,
/// attempt history in the usage logger. Constructed once at startup and
/// shared behind an `Arc`; safe for concurrent use.
pub struct Router {
    pub(crate) registry: Arc<ProviderRegistry>,
    pub(crate) invoker: Arc<dyn ProviderInvocation>,
    pub(crate) usage: UsageLogger,
    pub(crate) config: RouterConfig,
}

impl Router {
    /// Create a new router
    pub fn new(
        registry: Arc<ProviderRegistry>,
        invoker: Arc<dyn ProviderInvocation>,
        usage: UsageLogger,
        config: RouterConfig,
    ) -> Self {
        Self {
            registry,
            invoker,
            usage,
            config,
        }
    }

    /// The registry this router selects from
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// The usage logger attempts are recorded to
    pub fn usage(&self) -> &UsageLogger {
        &self.usage
    }

    /// The router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}
