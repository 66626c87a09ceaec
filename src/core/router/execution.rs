//! Request execution: the attempt loop
//!
//! One request is processed strictly sequentially (never two providers in
//! flight for the same request), so fallback and cost accounting stay
//! unambiguous: exactly one successful attempt per request, or none.

use super::error::{AttemptFailure, RouteError};
use super::router::Router;
use crate::core::cost::attempt_cost;
use crate::core::invoker::ProviderError;
use crate::core::types::{RouteRequest, RouteResponse};
use crate::monitoring::usage::AttemptRecord;
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

impl Router {
    /// Route one request to the first candidate that succeeds
    ///
    /// Tries each ranked candidate at most once. A per-attempt timeout bounds
    /// every invocation; timeout is treated like any other provider failure.
    /// Every attempt, failed or not, updates the registry's availability view
    /// and is recorded to the usage log.
    pub async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, RouteError> {
        let started = Instant::now();

        let candidates = self.candidates_for(&request.task_type, request.priority);
        if candidates.is_empty() {
            debug!(task = %request.task_type, "no candidates for task type");
            return Err(RouteError::NoCandidates {
                task_type: request.task_type.clone(),
            });
        }

        let attempt_timeout = effective_timeout(self.config.attempt_timeout, request.max_latency_ms);
        let mut failures: Vec<AttemptFailure> = Vec::new();

        for (index, provider) in candidates.iter().enumerate() {
            let fallback = index > 0;
            let fallback_reason = failures.last().map(|f| f.kind.to_string());

            let attempt_started = Instant::now();
            let outcome = match tokio::time::timeout(
                attempt_timeout,
                self.invoker.invoke(&provider.id, &request.prompt),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(attempt_timeout.as_millis() as u64)),
            };
            let attempt_ms = attempt_started.elapsed().as_millis() as u64;

            match outcome {
                Ok(invocation) => {
                    self.registry
                        .update_availability(&provider.id, true, Some(attempt_ms));

                    let cost = attempt_cost(invocation.tokens_used, provider.cost_per_token);
                    self.usage.record(AttemptRecord {
                        request_id: request.id,
                        provider_id: provider.id.clone(),
                        task_type: request.task_type.clone(),
                        timestamp: Utc::now(),
                        tokens_used: invocation.tokens_used,
                        response_time_ms: attempt_ms,
                        success: true,
                        error: None,
                        cost,
                        fallback,
                        fallback_reason,
                    });

                    debug!(
                        request = %request.id,
                        provider = %provider.id,
                        fallback,
                        elapsed_ms = attempt_ms,
                        "request routed"
                    );

                    return Ok(RouteResponse {
                        content: invocation.content,
                        provider: provider.id.clone(),
                        tokens_used: invocation.tokens_used,
                        cost,
                        response_time_ms: started.elapsed().as_millis() as u64,
                        fallback_used: fallback,
                        served_from_cache: false,
                    });
                }
                Err(err) => {
                    warn!(
                        request = %request.id,
                        provider = %provider.id,
                        error = %err,
                        "provider attempt failed"
                    );

                    self.registry.update_availability(&provider.id, false, None);
                    self.usage.record(AttemptRecord {
                        request_id: request.id,
                        provider_id: provider.id.clone(),
                        task_type: request.task_type.clone(),
                        timestamp: Utc::now(),
                        tokens_used: 0,
                        response_time_ms: attempt_ms,
                        success: false,
                        error: Some(err.to_string()),
                        cost: 0.0,
                        fallback,
                        fallback_reason,
                    });

                    failures.push(AttemptFailure {
                        provider_id: provider.id.clone(),
                        error: err.to_string(),
                        kind: err.kind(),
                    });
                }
            }
        }

        Err(RouteError::Exhausted {
            task_type: request.task_type.clone(),
            failures,
        })
    }
}

/// Per-attempt timeout: the configured bound, tightened by the request's
/// latency hint when one is present
fn effective_timeout(configured: Duration, max_latency_ms: Option<u64>) -> Duration {
    match max_latency_ms {
        Some(ms) => configured.min(Duration::from_millis(ms)),
        None => configured,
    }
}
