//! Provider invocation seam
//!
//! The router reaches backends exclusively through the [`ProviderInvocation`]
//! trait, so it never depends on a concrete vendor SDK. The crate ships one
//! production implementation ([`HttpInvoker`]) for OpenAI-style completion
//! endpoints; tests substitute doubles.

pub mod http;

pub use http::{HttpInvoker, InvocationTarget};

use async_trait::async_trait;
use thiserror::Error;

/// Result of one successful provider invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Completion content
    pub content: String,
    /// Tokens consumed by the backend
    pub tokens_used: u64,
}

/// Failure of a single provider invocation
///
/// Always caught by the router and converted into fallback to the next
/// candidate; never propagated raw to callers.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Transport-level failure reaching the backend
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("unexpected status {status}: {message}")]
    Http { status: u16, message: String },

    /// Backend answered 2xx but the body could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The attempt exceeded the per-attempt timeout
    #[error("attempt timed out after {0} ms")]
    Timeout(u64),

    /// The backend (or invoker) explicitly refused the request
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl ProviderError {
    /// Stable classification string, used to group fallback reasons
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "network",
            ProviderError::Http { .. } => "http_status",
            ProviderError::MalformedResponse(_) => "malformed_response",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Rejected(_) => "rejected",
        }
    }
}

/// Capability to invoke a backend provider's completion operation
///
/// Implementations must be safe for concurrent use; the router issues at most
/// one invocation per request at a time, but many requests run concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderInvocation: Send + Sync {
    /// Produce a completion for `prompt` using the backend behind `provider_id`
    async fn invoke(&self, provider_id: &str, prompt: &str) -> Result<Invocation, ProviderError>;
}
