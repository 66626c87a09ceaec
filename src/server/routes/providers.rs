//! Provider observability endpoint

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};

/// Configure provider endpoints
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/providers").route("/stats", web::get().to(provider_stats)));
}

/// Read-only snapshot of every registered provider
async fn provider_stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.registry.stats())
}
