//! Provider registry
//!
//! The authoritative, mutable view of which backend providers exist and
//! whether each is currently usable. Providers are registered at startup
//! from configuration and never deleted at runtime; a misbehaving provider
//! is disabled by flipping its availability flag.
//!
//! Runtime state (availability, last observed response time) uses atomics
//! with `Relaxed` ordering: the values are eventually consistent and routing
//! tolerates slightly stale state.

use crate::core::types::GENERAL_TASK;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering::Relaxed};
use tracing::{debug, warn};

/// Sentinel for "no response time observed yet"
const NEVER_OBSERVED: u64 = u64::MAX;

/// Static description of a provider, as supplied at registration
#[derive(Debug, Clone)]
pub struct ProviderSpec {
    /// Unique, stable identifier
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Task tags this provider declares support for
    pub task_types: Vec<String>,
    /// Prior belief of success, clamped to `0.0..=1.0`
    pub reliability: f64,
    /// Cost per token in account currency
    pub cost_per_token: f64,
}

/// Mutable runtime state of a provider
#[derive(Debug)]
pub struct ProviderState {
    /// Whether the provider is currently considered usable
    available: AtomicBool,
    /// Last observed response time in milliseconds ([`NEVER_OBSERVED`] = none)
    last_response_time_ms: AtomicU64,
}

impl ProviderState {
    fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            last_response_time_ms: AtomicU64::new(NEVER_OBSERVED),
        }
    }
}

/// A registered provider: immutable identity plus runtime state
#[derive(Debug)]
pub struct ProviderEntry {
    /// Unique, stable identifier (immutable once registered)
    pub id: String,
    /// Display name
    pub name: String,
    /// Declared task tags
    pub task_types: Vec<String>,
    /// Base reliability score (0.0–1.0)
    pub reliability: f64,
    /// Cost per token
    pub cost_per_token: f64,
    /// Runtime state (lock-free)
    state: ProviderState,
}

impl ProviderEntry {
    fn new(spec: ProviderSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name,
            task_types: spec.task_types,
            reliability: spec.reliability.clamp(0.0, 1.0),
            cost_per_token: spec.cost_per_token,
            state: ProviderState::new(),
        }
    }

    /// Whether the provider is currently marked available
    pub fn is_available(&self) -> bool {
        self.state.available.load(Relaxed)
    }

    /// Last observed response time, if any attempt has completed
    pub fn last_response_time_ms(&self) -> Option<u64> {
        match self.state.last_response_time_ms.load(Relaxed) {
            NEVER_OBSERVED => None,
            observed => Some(observed),
        }
    }

    /// Whether the provider declares support for `task_type`
    pub fn supports_task(&self, task_type: &str) -> bool {
        self.task_types.iter().any(|t| t == task_type)
    }
}

/// Read-only snapshot of one provider for observability consumers
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSnapshot {
    pub id: String,
    pub name: String,
    pub is_available: bool,
    pub reliability: f64,
}

/// Catalog of available backend providers
///
/// Lookups go through a [`DashMap`]; registration order is kept separately so
/// listing is stable and deterministic.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: DashMap<String, Arc<ProviderEntry>>,
    order: RwLock<Vec<String>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Register a provider
    ///
    /// Returns false (and leaves the registry unchanged) when the id is
    /// already taken.
    pub fn register(&self, spec: ProviderSpec) -> bool {
        if self.providers.contains_key(&spec.id) {
            warn!(provider = %spec.id, "duplicate provider registration ignored");
            return false;
        }
        let id = spec.id.clone();
        debug!(provider = %id, tasks = ?spec.task_types, "registering provider");
        self.providers
            .insert(id.clone(), Arc::new(ProviderEntry::new(spec)));
        self.order.write().push(id);
        true
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Look up a provider by id
    pub fn get(&self, id: &str) -> Option<Arc<ProviderEntry>> {
        self.providers.get(id).map(|entry| entry.value().clone())
    }

    /// All providers in registration order
    pub fn list_providers(&self) -> Vec<Arc<ProviderEntry>> {
        self.order
            .read()
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Providers declaring support for `task_type`, in registration order
    ///
    /// Falls back to providers declaring the general tag when no provider
    /// declares the specific task. Returns an empty vec when neither exists;
    /// the router treats that as a hard failure.
    pub fn providers_for_task(&self, task_type: &str) -> Vec<Arc<ProviderEntry>> {
        let all = self.list_providers();
        let declared: Vec<_> = all
            .iter()
            .filter(|p| p.supports_task(task_type))
            .cloned()
            .collect();
        if !declared.is_empty() || task_type == GENERAL_TASK {
            return declared;
        }
        all.into_iter()
            .filter(|p| p.supports_task(GENERAL_TASK))
            .collect()
    }

    /// Update a provider's availability and, optionally, its observed
    /// response time
    ///
    /// Unknown ids are ignored: a stale caller must not crash the request
    /// path.
    pub fn update_availability(
        &self,
        provider_id: &str,
        is_available: bool,
        response_time_ms: Option<u64>,
    ) {
        let Some(entry) = self.providers.get(provider_id) else {
            debug!(provider = provider_id, "availability update for unknown provider ignored");
            return;
        };
        entry.state.available.store(is_available, Relaxed);
        if let Some(observed) = response_time_ms {
            entry.state.last_response_time_ms.store(observed, Relaxed);
        }
    }

    /// Read-only snapshot of every provider, in registration order
    pub fn stats(&self) -> Vec<ProviderSnapshot> {
        self.list_providers()
            .into_iter()
            .map(|p| ProviderSnapshot {
                id: p.id.clone(),
                name: p.name.clone(),
                is_available: p.is_available(),
                reliability: p.reliability,
            })
            .collect()
    }
}
