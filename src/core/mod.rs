//! Core routing functionality
//!
//! Everything with a decision in it lives here: the provider catalog, the
//! selection policy and attempt loop, the admission queue, and the
//! invocation seam to the backends.

pub mod cost;
pub mod invoker;
pub mod queue;
pub mod registry;
pub mod router;
pub mod types;

pub use invoker::{HttpInvoker, Invocation, ProviderError, ProviderInvocation};
pub use queue::{QueueConfig, RequestQueue};
pub use registry::{ProviderEntry, ProviderRegistry, ProviderSnapshot, ProviderSpec};
pub use router::{AttemptFailure, RouteError, Router, RouterConfig};
pub use types::{GENERAL_TASK, Priority, RouteRequest, RouteResponse};
