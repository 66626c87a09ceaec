//! HTTP server module
//!
//! Exposes the routing core over HTTP: request submission plus the
//! observability endpoints (provider snapshot, usage metrics, health).

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;

pub use server::HttpServer;
pub use state::AppState;
