//! # MultiLLM-RS
//!
//! A multi-provider LLM request router written in Rust. Routes a logical
//! completion request to one of several interchangeable backends, with
//! task-aware provider selection, automatic fallback on failure, priority
//! queuing, and cost/latency bookkeeping.
//!
//! ## Features
//!
//! - **Task-aware selection**: providers declare task tags; requests are
//!   matched to the most reliable declared provider, with a general-purpose
//!   fallback pool
//! - **Deterministic ranking**: reliability-first ordering with
//!   priority-aware tie-breaking and no hidden randomness
//! - **Automatic fallback**: failed or timed-out attempts move on to the
//!   next candidate; each provider is tried at most once per request
//! - **Priority queuing**: bounded in-flight dispatch, high priority first,
//!   pre-dispatch cancellation
//! - **Usage accounting**: bounded attempt log with per-provider, fallback,
//!   and cost aggregates
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use multillm_rs::core::{
//!     Priority, ProviderRegistry, ProviderSpec, QueueConfig, RequestQueue, RouteRequest, Router,
//!     RouterConfig,
//! };
//! use multillm_rs::core::invoker::HttpInvoker;
//! use multillm_rs::monitoring::usage::UsageLogger;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(ProviderRegistry::new());
//!     registry.register(ProviderSpec {
//!         id: "primary".to_string(),
//!         name: "Primary".to_string(),
//!         task_types: vec!["general".to_string()],
//!         reliability: 0.9,
//!         cost_per_token: 0.00003,
//!     });
//!
//!     let router = Arc::new(Router::new(
//!         registry,
//!         Arc::new(HttpInvoker::new()),
//!         UsageLogger::new(),
//!         RouterConfig::default(),
//!     ));
//!     let queue = RequestQueue::start(router, QueueConfig::default());
//!
//!     let request = RouteRequest::new("Hello!", "general", Priority::Medium);
//!     let response = queue.submit(request).await?;
//!     println!("{} answered: {}", response.provider, response.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     multillm_rs::server::builder::run_server("config/gateway.yaml").await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use core::{
    GENERAL_TASK, HttpInvoker, Invocation, Priority, ProviderError, ProviderInvocation,
    ProviderRegistry, ProviderSnapshot, ProviderSpec, QueueConfig, RequestQueue, RouteError,
    RouteRequest, RouteResponse, Router, RouterConfig,
};
pub use monitoring::usage::{
    AttemptRecord, CostMetrics, FallbackMetrics, ProviderStatistics, UsageLogger,
};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
