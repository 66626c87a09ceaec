//! Queue dispatch-order and cancellation tests

use super::*;
use crate::core::invoker::{Invocation, ProviderError, ProviderInvocation};
use crate::core::registry::{ProviderRegistry, ProviderSpec};
use crate::core::router::RouterConfig;
use crate::monitoring::usage::UsageLogger;
use async_trait::async_trait;
use std::time::Duration;

/// Invoker that records dispatch order and can hold the "blocker" prompt
/// in flight until the test releases it
struct GatedInvoker {
    gate: Semaphore,
    started: Notify,
    order: Mutex<Vec<String>>,
}

impl GatedInvoker {
    fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            started: Notify::new(),
            order: Mutex::new(Vec::new()),
        }
    }

    fn order(&self) -> Vec<String> {
        self.order.lock().clone()
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl ProviderInvocation for GatedInvoker {
    async fn invoke(&self, _provider_id: &str, prompt: &str) -> Result<Invocation, ProviderError> {
        self.order.lock().push(prompt.to_string());
        if prompt == "blocker" {
            self.started.notify_one();
            let _permit = self.gate.acquire().await;
        }
        Ok(Invocation {
            content: format!("done: {prompt}"),
            tokens_used: 5,
        })
    }
}

fn build_queue(invoker: Arc<GatedInvoker>, max_in_flight: usize) -> Arc<RequestQueue> {
    let registry = Arc::new(ProviderRegistry::new());
    registry.register(ProviderSpec {
        id: "only".to_string(),
        name: "Only Provider".to_string(),
        task_types: vec!["general".to_string()],
        reliability: 0.9,
        cost_per_token: 0.00001,
    });
    let router = Arc::new(Router::new(
        registry,
        invoker,
        UsageLogger::new(),
        RouterConfig::default(),
    ));
    Arc::new(RequestQueue::start(router, QueueConfig { max_in_flight }))
}

async fn wait_for_queued(queue: &RequestQueue, expected: usize) {
    for _ in 0..200 {
        if queue.queued_len() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "queue never reached {expected} waiting entries (currently {})",
        queue.queued_len()
    );
}

#[tokio::test]
async fn test_high_priority_dispatched_before_older_low_priority() {
    let invoker = Arc::new(GatedInvoker::new());
    let queue = build_queue(invoker.clone(), 1);

    // occupy the single in-flight slot
    let blocker = RouteRequest::new("blocker", "general", Priority::Medium);
    let blocker_handle = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.submit(blocker).await })
    };
    invoker.started.notified().await;

    // low arrives before high, both wait behind the blocker
    let low = RouteRequest::new("low-prompt", "general", Priority::Low);
    let high = RouteRequest::new("high-prompt", "general", Priority::High);
    let low_handle = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.submit(low).await })
    };
    wait_for_queued(&queue, 1).await;
    let high_handle = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.submit(high).await })
    };
    wait_for_queued(&queue, 2).await;

    invoker.release();

    let blocker_result = blocker_handle.await.unwrap();
    let low_result = low_handle.await.unwrap();
    let high_result = high_handle.await.unwrap();
    assert!(blocker_result.is_ok());
    assert!(low_result.is_ok());
    assert!(high_result.is_ok());

    // high overtakes the earlier-enqueued low
    assert_eq!(invoker.order(), vec!["blocker", "high-prompt", "low-prompt"]);
}

#[tokio::test]
async fn test_fifo_within_same_priority() {
    let invoker = Arc::new(GatedInvoker::new());
    let queue = build_queue(invoker.clone(), 1);

    let blocker = RouteRequest::new("blocker", "general", Priority::Medium);
    let blocker_handle = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.submit(blocker).await })
    };
    invoker.started.notified().await;

    let mut handles = Vec::new();
    for name in ["m1", "m2", "m3"] {
        let request = RouteRequest::new(name, "general", Priority::Medium);
        let queue_clone = Arc::clone(&queue);
        handles.push(tokio::spawn(async move { queue_clone.submit(request).await }));
        wait_for_queued(&queue, handles.len()).await;
    }

    invoker.release();
    assert!(blocker_handle.await.unwrap().is_ok());
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(invoker.order(), vec!["blocker", "m1", "m2", "m3"]);
}

#[tokio::test]
async fn test_cancel_queued_request() {
    let invoker = Arc::new(GatedInvoker::new());
    let queue = build_queue(invoker.clone(), 1);

    let blocker = RouteRequest::new("blocker", "general", Priority::Medium);
    let blocker_handle = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.submit(blocker).await })
    };
    invoker.started.notified().await;

    let doomed = RouteRequest::new("doomed", "general", Priority::Low);
    let doomed_id = doomed.id;
    let doomed_handle = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.submit(doomed).await })
    };
    wait_for_queued(&queue, 1).await;

    assert!(queue.cancel(doomed_id));
    let result = doomed_handle.await.unwrap();
    match result {
        Err(RouteError::Cancelled { request_id }) => assert_eq!(request_id, doomed_id),
        other => panic!("expected Cancelled, got {other:?}"),
    }

    invoker.release();
    assert!(blocker_handle.await.unwrap().is_ok());

    // the cancelled request never reached the invoker
    assert_eq!(invoker.order(), vec!["blocker"]);
}

#[tokio::test]
async fn test_cancel_unknown_or_dispatched_request() {
    let invoker = Arc::new(GatedInvoker::new());
    let queue = build_queue(invoker.clone(), 1);

    // unknown id
    assert!(!queue.cancel(Uuid::new_v4()));

    // already dispatched: in flight, no longer queued
    let blocker = RouteRequest::new("blocker", "general", Priority::Medium);
    let blocker_id = blocker.id;
    let blocker_handle = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.submit(blocker).await })
    };
    invoker.started.notified().await;
    assert!(!queue.cancel(blocker_id));

    invoker.release();
    assert!(blocker_handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_requests_flow_when_under_limit() {
    let invoker = Arc::new(GatedInvoker::new());
    let queue = build_queue(invoker.clone(), 4);

    let request = RouteRequest::new("solo", "general", Priority::Low);
    let response = queue.submit(request).await.unwrap();
    assert_eq!(response.content, "done: solo");
    assert_eq!(response.provider, "only");
    assert_eq!(queue.queued_len(), 0);
}
