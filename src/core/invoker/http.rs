//! HTTP-backed provider invocation
//!
//! Speaks a minimal OpenAI-style completion contract: `POST` to the
//! provider's configured endpoint with `{model, prompt}`, expect
//! `{content, tokens_used}` back. One invoker instance serves every
//! configured provider; per-provider endpoint, credential, and model name
//! live in an [`InvocationTarget`].

use super::{Invocation, ProviderError, ProviderInvocation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Where and how to reach one provider's completion endpoint
#[derive(Debug, Clone)]
pub struct InvocationTarget {
    /// Full URL of the completion endpoint
    pub endpoint: String,
    /// Bearer token attached to every request, if any
    pub api_key: Option<String>,
    /// Model name sent in the request body
    pub model: String,
}

/// Wire request body
#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Wire response body
#[derive(Debug, Deserialize)]
struct CompletionReply {
    content: String,
    tokens_used: u64,
}

/// [`ProviderInvocation`] implementation over HTTP
pub struct HttpInvoker {
    client: reqwest::Client,
    targets: HashMap<String, InvocationTarget>,
}

impl HttpInvoker {
    /// Create an invoker with no targets
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            targets: HashMap::new(),
        }
    }

    /// Register the invocation target for a provider id (builder pattern)
    pub fn with_target(mut self, provider_id: impl Into<String>, target: InvocationTarget) -> Self {
        self.targets.insert(provider_id.into(), target);
        self
    }

    /// Number of registered targets
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

impl Default for HttpInvoker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderInvocation for HttpInvoker {
    async fn invoke(&self, provider_id: &str, prompt: &str) -> Result<Invocation, ProviderError> {
        let target = self.targets.get(provider_id).ok_or_else(|| {
            ProviderError::Rejected(format!("no invocation target for provider '{provider_id}'"))
        })?;

        debug!(provider = provider_id, endpoint = %target.endpoint, "invoking provider");

        let mut request = self.client.post(&target.endpoint).json(&CompletionBody {
            model: &target.model,
            prompt,
        });
        if let Some(key) = &target.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| String::new());
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let reply: CompletionReply = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(Invocation {
            content: reply.content,
            tokens_used: reply.tokens_used,
        })
    }
}
