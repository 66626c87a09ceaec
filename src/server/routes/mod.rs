//! HTTP route modules
//!
//! Route handlers organized by functionality. Success payloads are the raw
//! documented response shapes; failures use the shared [`ErrorBody`].

pub mod health;
pub mod metrics;
pub mod providers;
pub mod route;

use crate::core::router::{AttemptFailure, RouteError};
use actix_web::HttpResponse;

/// Error response body
#[derive(Debug, Clone, serde::Serialize)]
pub struct ErrorBody {
    /// Human-readable error description
    pub error: String,
    /// Per-provider failure details, present for exhausted requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<AttemptFailure>>,
}

/// Map a routing failure to its HTTP representation
///
/// Exhaustion means "try again later" (503); an unknown task type means the
/// request itself is wrong (400). Cancellation only occurs for library
/// callers but is mapped for completeness.
pub fn route_error_response(error: &RouteError) -> HttpResponse {
    match error {
        RouteError::NoCandidates { .. } => HttpResponse::BadRequest().json(ErrorBody {
            error: error.to_string(),
            failures: None,
        }),
        RouteError::Exhausted { failures, .. } => {
            HttpResponse::ServiceUnavailable().json(ErrorBody {
                error: error.to_string(),
                failures: Some(failures.clone()),
            })
        }
        RouteError::Cancelled { .. } => HttpResponse::Conflict().json(ErrorBody {
            error: error.to_string(),
            failures: None,
        }),
    }
}
