//! Health check and version endpoints

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/version", web::get().to(version_info));
}

/// Basic health check endpoint
///
/// Used by load balancers and monitoring systems; reports how many providers
/// are currently marked available.
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let stats = state.registry.stats();
    let available = stats.iter().filter(|s| s.is_available).count();

    HttpResponse::Ok().json(HealthStatus {
        status: if available > 0 || stats.is_empty() {
            Cow::Borrowed("healthy")
        } else {
            Cow::Borrowed("degraded")
        },
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        providers_total: stats.len(),
        providers_available: available,
    })
}

/// Version information endpoint
async fn version_info() -> HttpResponse {
    debug!("Version info requested");

    HttpResponse::Ok().json(VersionInfo {
        name: Cow::Borrowed(env!("CARGO_PKG_NAME")),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    })
}

/// Basic health status
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
    providers_total: usize,
    providers_available: usize,
}

/// Version information
#[derive(Debug, Clone, serde::Serialize)]
struct VersionInfo {
    name: Cow<'static, str>,
    version: Cow<'static, str>,
}
