//! Routing error taxonomy
//!
//! Provider-level failures are recovered locally by falling back to the next
//! candidate; only request-level failures defined here reach the caller.

use serde::Serialize;
use uuid::Uuid;

/// One failed provider attempt, attached to [`RouteError::Exhausted`] for
/// diagnosis
#[derive(Debug, Clone, Serialize)]
pub struct AttemptFailure {
    /// Provider that failed
    pub provider_id: String,
    /// Human-readable failure detail
    pub error: String,
    /// Stable failure classification (see `ProviderError::kind`)
    pub kind: &'static str,
}

/// Request-level routing failure
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// No provider declares support for the task type, even after the
    /// general-tag fallback. Not retried; indicates misconfiguration.
    #[error("no provider supports task type '{task_type}'")]
    NoCandidates { task_type: String },

    /// Every candidate was attempted and failed. Callers may retry later.
    #[error("all {} candidate providers failed for task type '{task_type}'", .failures.len())]
    Exhausted {
        task_type: String,
        failures: Vec<AttemptFailure>,
    },

    /// The request was cancelled while still queued, before dispatch
    #[error("request {request_id} was cancelled before dispatch")]
    Cancelled { request_id: Uuid },
}
