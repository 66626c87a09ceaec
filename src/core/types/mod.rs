//! Request and response types shared across the routing core

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task tag every provider may declare as a catch-all capability.
///
/// When no provider declares a request's task type, the registry falls back
/// to providers declaring this tag.
pub const GENERAL_TASK: &str = "general";

/// Request priority
///
/// Ordered so that `Low < Medium < High`. The queue dispatches higher
/// priorities first; the router uses priority to break reliability ties
/// during candidate ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A unit of routable work submitted by a caller
///
/// Immutable once constructed: the queue and router only read it. The id is
/// generated at submission time and is the handle for pre-dispatch
/// cancellation.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// Unique request id, generated at construction
    pub id: Uuid,

    /// Opaque prompt content forwarded verbatim to the provider
    pub prompt: String,

    /// Task tag used for candidate selection (e.g. "coding", "general")
    pub task_type: String,

    /// Request priority
    pub priority: Priority,

    /// Optional per-attempt latency hint in milliseconds
    ///
    /// The effective per-attempt timeout is the smaller of this hint and the
    /// router's configured attempt timeout.
    pub max_latency_ms: Option<u64>,
}

impl RouteRequest {
    /// Create a new request with a fresh id
    pub fn new(prompt: impl Into<String>, task_type: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            task_type: task_type.into(),
            priority,
            max_latency_ms: None,
        }
    }

    /// Set a per-attempt latency hint (builder pattern)
    pub fn with_max_latency_ms(mut self, max_latency_ms: u64) -> Self {
        self.max_latency_ms = Some(max_latency_ms);
        self
    }
}

/// The result of successfully routing a request
#[derive(Debug, Clone, Serialize)]
pub struct RouteResponse {
    /// Completion content produced by the provider
    pub content: String,

    /// Id of the provider that produced the content
    pub provider: String,

    /// Tokens consumed by the successful attempt
    pub tokens_used: u64,

    /// `tokens_used * cost_per_token`, rounded to 6 decimal places
    pub cost: f64,

    /// Total wall-clock routing time in milliseconds, including failed attempts
    pub response_time_ms: u64,

    /// True when the successful attempt was not the first-ranked candidate
    pub fallback_used: bool,

    /// Reserved for a response cache; always false
    pub served_from_cache: bool,
}
