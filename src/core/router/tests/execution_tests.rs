//! Attempt loop tests: fallback, exhaustion, and accounting

use super::selection_tests::spec;
use crate::core::invoker::{Invocation, ProviderError, ProviderInvocation};
use crate::core::registry::ProviderRegistry;
use crate::core::router::{RouteError, Router, RouterConfig};
use crate::core::types::{Priority, RouteRequest};
use crate::monitoring::usage::UsageLogger;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Invoker double with scripted per-provider outcomes and a call log
#[derive(Default)]
pub(super) struct ScriptedInvoker {
    outcomes: Mutex<HashMap<String, VecDeque<Result<Invocation, ProviderError>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, provider_id: &str, outcome: Result<Invocation, ProviderError>) {
        self.outcomes
            .lock()
            .entry(provider_id.to_string())
            .or_default()
            .push_back(outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ProviderInvocation for ScriptedInvoker {
    async fn invoke(&self, provider_id: &str, _prompt: &str) -> Result<Invocation, ProviderError> {
        self.calls.lock().push(provider_id.to_string());
        self.outcomes
            .lock()
            .get_mut(provider_id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(ProviderError::Rejected("unscripted provider".to_string())))
    }
}

fn ok(content: &str, tokens: u64) -> Result<Invocation, ProviderError> {
    Ok(Invocation {
        content: content.to_string(),
        tokens_used: tokens,
    })
}

fn build_router(registry: Arc<ProviderRegistry>, invoker: Arc<ScriptedInvoker>) -> Router {
    Router::new(
        registry,
        invoker,
        UsageLogger::new(),
        RouterConfig {
            attempt_timeout: Duration::from_secs(5),
        },
    )
}

#[tokio::test]
async fn test_first_choice_succeeds_without_fallback() {
    let registry = Arc::new(ProviderRegistry::new());
    registry.register(spec("a", &["general"], 0.9, 0.00003));
    registry.register(spec("b", &["general"], 0.7, 0.00001));

    let invoker = Arc::new(ScriptedInvoker::new());
    invoker.script("a", ok("answer from a", 200));

    let router = build_router(registry, invoker.clone());
    let request = RouteRequest::new("hello", "general", Priority::Medium);
    let response = router.route(&request).await.unwrap();

    assert_eq!(response.provider, "a");
    assert_eq!(response.content, "answer from a");
    assert!(!response.fallback_used);
    assert!(!response.served_from_cache);
    assert_eq!(invoker.calls(), vec!["a"]);
}

#[tokio::test]
async fn test_fallback_to_second_candidate() {
    let registry = Arc::new(ProviderRegistry::new());
    registry.register(spec("a", &["general"], 0.9, 0.00003));
    registry.register(spec("b", &["general"], 0.7, 0.00001));

    let invoker = Arc::new(ScriptedInvoker::new());
    invoker.script(
        "a",
        Err(ProviderError::Network("connection reset".to_string())),
    );
    invoker.script("b", ok("answer from b", 150));

    let router = build_router(registry.clone(), invoker.clone());
    let request = RouteRequest::new("hello", "general", Priority::Medium);
    let response = router.route(&request).await.unwrap();

    assert_eq!(response.provider, "b");
    assert!(response.fallback_used);
    assert_eq!(invoker.calls(), vec!["a", "b"]);

    // the failing provider was marked unavailable, the serving one available
    assert!(!registry.get("a").unwrap().is_available());
    assert!(registry.get("b").unwrap().is_available());
    assert!(registry.get("b").unwrap().last_response_time_ms().is_some());

    // both attempts were logged, the failure first
    router.usage().flush().await;
    let recent = router.usage().recent(10);
    assert_eq!(recent.len(), 2);
    assert!(recent[0].success);
    assert!(recent[0].fallback);
    assert_eq!(recent[0].fallback_reason.as_deref(), Some("network"));
    assert!(!recent[1].success);
    assert!(!recent[1].fallback);
}

#[tokio::test]
async fn test_exhausted_after_every_candidate_fails() {
    let registry = Arc::new(ProviderRegistry::new());
    registry.register(spec("a", &["general"], 0.9, 0.00003));
    registry.register(spec("b", &["general"], 0.7, 0.00001));
    registry.update_availability("a", false, None);
    registry.update_availability("b", false, None);

    let invoker = Arc::new(ScriptedInvoker::new());
    invoker.script("a", Err(ProviderError::Network("down".to_string())));
    invoker.script(
        "b",
        Err(ProviderError::Http {
            status: 500,
            message: "internal".to_string(),
        }),
    );

    let router = build_router(registry, invoker.clone());
    let request = RouteRequest::new("hello", "general", Priority::Medium);
    let err = router.route(&request).await.unwrap_err();

    match err {
        RouteError::Exhausted {
            task_type,
            failures,
        } => {
            assert_eq!(task_type, "general");
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].provider_id, "a");
            assert_eq!(failures[0].kind, "network");
            assert_eq!(failures[1].provider_id, "b");
            assert_eq!(failures[1].kind, "http_status");
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
    assert_eq!(invoker.calls(), vec!["a", "b"]);
}

#[tokio::test]
async fn test_unknown_task_fails_fast_with_no_attempts() {
    let registry = Arc::new(ProviderRegistry::new());
    registry.register(spec("coder", &["coding"], 0.9, 0.00003));

    let invoker = Arc::new(ScriptedInvoker::new());
    let router = build_router(registry, invoker.clone());

    let request = RouteRequest::new("hello", "unknown-task", Priority::Medium);
    let err = router.route(&request).await.unwrap_err();

    assert!(matches!(err, RouteError::NoCandidates { .. }));
    assert!(invoker.calls().is_empty());

    router.usage().flush().await;
    assert!(router.usage().is_empty());
}

#[tokio::test]
async fn test_no_provider_tried_twice() {
    let registry = Arc::new(ProviderRegistry::new());
    registry.register(spec("a", &["general"], 0.9, 0.00003));
    registry.register(spec("b", &["general"], 0.7, 0.00001));
    registry.register(spec("c", &["general"], 0.5, 0.00002));

    let invoker = Arc::new(ScriptedInvoker::new());
    for id in ["a", "b", "c"] {
        invoker.script(id, Err(ProviderError::Rejected("no".to_string())));
    }

    let router = build_router(registry, invoker.clone());
    let request = RouteRequest::new("hello", "general", Priority::Medium);
    let _ = router.route(&request).await;

    let calls = invoker.calls();
    assert_eq!(calls, vec!["a", "b", "c"]);
    let mut deduped = calls.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), calls.len());
}

#[tokio::test]
async fn test_cost_accounting() {
    let registry = Arc::new(ProviderRegistry::new());
    registry.register(spec("a", &["general"], 0.9, 0.00003));

    let invoker = Arc::new(ScriptedInvoker::new());
    invoker.script("a", ok("answer", 1234));

    let router = build_router(registry, invoker);
    let request = RouteRequest::new("hello", "general", Priority::Medium);
    let response = router.route(&request).await.unwrap();

    assert_eq!(response.tokens_used, 1234);
    // 1234 * 0.00003 = 0.03702
    assert!((response.cost - 0.03702).abs() < 1e-12);

    router.usage().flush().await;
    let recent = router.usage().recent(1);
    assert_eq!(recent[0].cost, response.cost);
    assert_eq!(recent[0].tokens_used, 1234);
}

#[tokio::test]
async fn test_attempt_timeout_triggers_fallback() {
    struct StallingInvoker {
        inner: ScriptedInvoker,
    }

    #[async_trait]
    impl ProviderInvocation for StallingInvoker {
        async fn invoke(
            &self,
            provider_id: &str,
            prompt: &str,
        ) -> Result<Invocation, ProviderError> {
            if provider_id == "stuck" {
                // well beyond the configured attempt timeout
                tokio::time::sleep(Duration::from_secs(600)).await;
            }
            self.inner.invoke(provider_id, prompt).await
        }
    }

    let registry = Arc::new(ProviderRegistry::new());
    registry.register(spec("stuck", &["general"], 0.9, 0.00003));
    registry.register(spec("b", &["general"], 0.7, 0.00001));

    let inner = ScriptedInvoker::new();
    inner.script("b", ok("answer from b", 10));
    let invoker = Arc::new(StallingInvoker { inner });

    let router = Router::new(
        registry.clone(),
        invoker,
        UsageLogger::new(),
        RouterConfig {
            attempt_timeout: Duration::from_millis(50),
        },
    );

    let request = RouteRequest::new("hello", "general", Priority::Medium);
    let response = router.route(&request).await.unwrap();

    assert_eq!(response.provider, "b");
    assert!(response.fallback_used);
    assert!(!registry.get("stuck").unwrap().is_available());

    router.usage().flush().await;
    let recent = router.usage().recent(10);
    assert_eq!(recent.len(), 2);
    assert!(recent[1].error.as_deref().unwrap_or("").contains("timed out"));
    assert_eq!(recent[0].fallback_reason.as_deref(), Some("timeout"));
}

#[tokio::test]
async fn test_latency_hint_tightens_timeout() {
    struct SlowInvoker;

    #[async_trait]
    impl ProviderInvocation for SlowInvoker {
        async fn invoke(&self, _: &str, _: &str) -> Result<Invocation, ProviderError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(Invocation {
                content: "late".to_string(),
                tokens_used: 1,
            })
        }
    }

    let registry = Arc::new(ProviderRegistry::new());
    registry.register(spec("a", &["general"], 0.9, 0.00003));

    let router = Router::new(
        registry,
        Arc::new(SlowInvoker),
        UsageLogger::new(),
        RouterConfig {
            attempt_timeout: Duration::from_secs(5),
        },
    );

    let request = RouteRequest::new("hello", "general", Priority::Medium).with_max_latency_ms(20);
    let err = router.route(&request).await.unwrap_err();
    assert!(matches!(err, RouteError::Exhausted { .. }));
}
