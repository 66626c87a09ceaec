//! Usage metrics endpoints

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

/// Configure metrics endpoints
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/metrics")
            .route("/models", web::get().to(model_stats))
            .route("/fallbacks", web::get().to(fallback_metrics))
            .route("/cost", web::get().to(cost_metrics))
            .route("/recent", web::get().to(recent_attempts)),
    );
}

/// Aggregate statistics grouped by (provider, task type)
async fn model_stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.usage.model_stats())
}

/// Fallback usage metrics
async fn fallback_metrics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.usage.fallback_metrics())
}

/// Cost metrics across grouping dimensions
async fn cost_metrics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.usage.cost_metrics())
}

/// Query parameters for the recent-attempts endpoint
#[derive(Debug, Deserialize)]
struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    limit: usize,
}

fn default_recent_limit() -> usize {
    100
}

/// Most recent attempt records, newest first
async fn recent_attempts(
    state: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.usage.recent(query.limit))
}
