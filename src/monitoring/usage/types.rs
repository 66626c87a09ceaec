//! Usage log record and derived aggregate types
//!
//! A closed set of explicit record types: the log entry itself plus the
//! three aggregate views computed from it. No open maps, so aggregation code
//! is checked at compile time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One provider invocation, success or failure
///
/// Append-only: never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    /// Request this attempt belongs to
    pub request_id: Uuid,
    /// Provider that was invoked
    pub provider_id: String,
    /// Task type of the originating request
    pub task_type: String,
    /// When the attempt completed
    pub timestamp: DateTime<Utc>,
    /// Tokens consumed (0 for failed attempts)
    pub tokens_used: u64,
    /// Attempt duration in milliseconds
    pub response_time_ms: u64,
    /// Whether the attempt succeeded
    pub success: bool,
    /// Failure detail when `success` is false
    pub error: Option<String>,
    /// Cost of the attempt (0 for failed attempts)
    pub cost: f64,
    /// True when this was not the first candidate tried for the request
    pub fallback: bool,
    /// Classification of the failure that made this attempt a fallback
    pub fallback_reason: Option<String>,
}

/// Aggregate statistics for one (provider, task type) group
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatistics {
    pub provider_id: String,
    pub task_type: String,
    pub total_calls: u64,
    pub total_tokens: u64,
    /// Running average, maintained incrementally as
    /// `avg_n = avg_{n-1} + (x_n - avg_{n-1}) / n`
    pub avg_response_time_ms: f64,
    /// Percentage of attempts in this group with `success == true`
    pub success_rate: f64,
    pub total_cost: f64,
}

/// Fallback usage, partitioned by the per-attempt fallback flag
#[derive(Debug, Clone, Serialize)]
pub struct FallbackMetrics {
    /// Attempts made at candidate index > 0
    pub total_fallbacks: u64,
    /// Fallback attempts grouped by the reason the prior candidate failed
    pub fallbacks_by_reason: BTreeMap<String, u64>,
    /// Fallback attempts grouped by the provider that served them
    pub fallbacks_by_provider: BTreeMap<String, u64>,
    /// Average duration of attempts in the fallback partition
    pub avg_response_time_with_fallback_ms: f64,
    /// Average duration of attempts in the non-fallback partition
    pub avg_response_time_without_fallback_ms: f64,
}

/// Cost totals, broken down along each grouping dimension
#[derive(Debug, Clone, Serialize)]
pub struct CostMetrics {
    pub total_cost: f64,
    /// Keyed by UTC day (`YYYY-MM-DD`)
    pub cost_by_day: BTreeMap<String, f64>,
    pub cost_by_provider: BTreeMap<String, f64>,
    pub cost_by_task: BTreeMap<String, f64>,
}
