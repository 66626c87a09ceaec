//! Candidate selection and ranking
//!
//! Given a task type and a priority, produce the ordered list of providers
//! the router will attempt. The ordering is fully deterministic: identical
//! registry state and identical inputs always yield the same list.

use crate::core::registry::{ProviderEntry, ProviderRegistry};
use crate::core::types::Priority;
use std::cmp::Ordering;
use std::sync::Arc;

use super::router::Router;

/// Build the ranked candidate list for one request
///
/// Filtering: providers declaring the task type (with the general-tag
/// fallback applied by the registry), restricted to currently-available
/// providers. When every declared provider is marked unavailable the full
/// declared list is used instead: availability flags can be stale and
/// degrading beats failing outright.
///
/// Ranking, applied to the filtered list:
/// 1. reliability, descending;
/// 2. priority-aware tie-break: `High` prefers the lowest observed response
///    time (never-observed sorts last), `Low` prefers the lowest
///    cost-per-token, `Medium` has no secondary key;
/// 3. registration order.
pub fn ranked_candidates(
    registry: &ProviderRegistry,
    task_type: &str,
    priority: Priority,
) -> Vec<Arc<ProviderEntry>> {
    let declared = registry.providers_for_task(task_type);

    let mut pool: Vec<(usize, Arc<ProviderEntry>)> = declared
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_available())
        .map(|(index, p)| (index, p.clone()))
        .collect();

    // last resort: stale availability must not turn into a hard failure
    if pool.is_empty() {
        pool = declared.into_iter().enumerate().collect();
    }

    pool.sort_by(|(index_a, a), (index_b, b)| {
        b.reliability
            .total_cmp(&a.reliability)
            .then_with(|| tie_break(a, b, priority))
            .then_with(|| index_a.cmp(index_b))
    });

    pool.into_iter().map(|(_, p)| p).collect()
}

fn tie_break(a: &ProviderEntry, b: &ProviderEntry, priority: Priority) -> Ordering {
    match priority {
        Priority::High => observed_or_max(a).cmp(&observed_or_max(b)),
        Priority::Low => a.cost_per_token.total_cmp(&b.cost_per_token),
        Priority::Medium => Ordering::Equal,
    }
}

fn observed_or_max(provider: &ProviderEntry) -> u64 {
    provider.last_response_time_ms().unwrap_or(u64::MAX)
}

impl Router {
    /// Ranked candidate list for a request with the given task type and
    /// priority
    pub fn candidates_for(&self, task_type: &str, priority: Priority) -> Vec<Arc<ProviderEntry>> {
        ranked_candidates(&self.registry, task_type, priority)
    }
}
