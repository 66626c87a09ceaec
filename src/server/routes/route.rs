//! Request routing endpoint

use crate::core::types::{Priority, RouteRequest};
use crate::server::routes::route_error_response;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::debug;

/// Configure routing endpoints
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/route", web::post().to(route_completion));
}

/// Request body for `POST /route`
#[derive(Debug, Deserialize)]
pub struct RouteBody {
    /// Prompt forwarded to the selected provider
    pub prompt: String,
    /// Task tag for candidate selection
    pub task_type: String,
    /// Request priority; defaults to medium
    #[serde(default)]
    pub priority: Priority,
    /// Optional per-attempt latency hint in milliseconds
    #[serde(default)]
    pub max_latency_ms: Option<u64>,
}

/// Route a completion request through the queue and router
async fn route_completion(state: web::Data<AppState>, body: web::Json<RouteBody>) -> HttpResponse {
    let body = body.into_inner();

    let mut request = RouteRequest::new(body.prompt, body.task_type, body.priority);
    if let Some(ms) = body.max_latency_ms {
        request = request.with_max_latency_ms(ms);
    }

    debug!(request = %request.id, task = %request.task_type, priority = ?request.priority, "routing request received");

    match state.queue.submit(request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => route_error_response(&err),
    }
}
