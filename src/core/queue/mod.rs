//! Request queue and admission control
//!
//! Serializes bursts of concurrent requests in front of the router so that
//! providers are not overwhelmed and high-priority work is never starved by
//! a backlog of low-priority work.
//!
//! Three FIFO lanes (high/medium/low) feed a single dispatcher task. The
//! dispatcher acquires a semaphore permit (the configured in-flight bound),
//! pops the highest-priority oldest request, and spawns its routing future;
//! the permit is released when routing completes. A request that is still
//! queued can be cancelled by id; once dispatched it runs to completion.

use crate::core::router::{RouteError, Router};
use crate::core::types::{Priority, RouteRequest, RouteResponse};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// Queue configuration
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum number of requests concurrently dispatched to the router
    pub max_in_flight: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { max_in_flight: 4 }
    }
}

struct Pending {
    request: RouteRequest,
    tx: oneshot::Sender<Result<RouteResponse, RouteError>>,
}

#[derive(Default)]
struct Lanes {
    high: VecDeque<Pending>,
    medium: VecDeque<Pending>,
    low: VecDeque<Pending>,
}

impl Lanes {
    fn push(&mut self, pending: Pending) {
        match pending.request.priority {
            Priority::High => self.high.push_back(pending),
            Priority::Medium => self.medium.push_back(pending),
            Priority::Low => self.low.push_back(pending),
        }
    }

    /// Highest-priority, oldest-enqueued entry
    fn pop(&mut self) -> Option<Pending> {
        self.high
            .pop_front()
            .or_else(|| self.medium.pop_front())
            .or_else(|| self.low.pop_front())
    }

    fn remove(&mut self, request_id: Uuid) -> Option<Pending> {
        for lane in [&mut self.high, &mut self.medium, &mut self.low] {
            if let Some(index) = lane.iter().position(|p| p.request.id == request_id) {
                return lane.remove(index);
            }
        }
        None
    }

    fn len(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }
}

struct QueueInner {
    lanes: Mutex<Lanes>,
    notify: Notify,
    semaphore: Arc<Semaphore>,
    router: Arc<Router>,
}

/// Priority admission queue in front of the router
pub struct RequestQueue {
    inner: Arc<QueueInner>,
    dispatcher: JoinHandle<()>,
}

impl RequestQueue {
    /// Create the queue and start its dispatcher task
    pub fn start(router: Arc<Router>, config: QueueConfig) -> Self {
        let inner = Arc::new(QueueInner {
            lanes: Mutex::new(Lanes::default()),
            notify: Notify::new(),
            semaphore: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            router,
        });
        let dispatcher = tokio::spawn(dispatch_loop(Arc::clone(&inner)));
        Self { inner, dispatcher }
    }

    /// Submit a request and wait for its outcome
    ///
    /// Resolves once the router has produced a response or a terminal
    /// failure, or when the request is cancelled before dispatch.
    pub async fn submit(&self, request: RouteRequest) -> Result<RouteResponse, RouteError> {
        let request_id = request.id;
        let (tx, rx) = oneshot::channel();

        {
            let mut lanes = self.inner.lanes.lock();
            lanes.push(Pending { request, tx });
        }
        self.inner.notify.notify_one();
        debug!(request = %request_id, "request enqueued");

        match rx.await {
            Ok(result) => result,
            // dispatcher gone (shutdown): treat as pre-dispatch cancellation
            Err(_) => Err(RouteError::Cancelled { request_id }),
        }
    }

    /// Cancel a still-queued request by id
    ///
    /// Returns true when the request was found and removed; its submit future
    /// resolves with [`RouteError::Cancelled`]. A request already dispatched
    /// to the router cannot be cancelled.
    pub fn cancel(&self, request_id: Uuid) -> bool {
        let removed = { self.inner.lanes.lock().remove(request_id) };
        match removed {
            Some(pending) => {
                debug!(request = %request_id, "queued request cancelled");
                let _ = pending.tx.send(Err(RouteError::Cancelled { request_id }));
                true
            }
            None => false,
        }
    }

    /// Number of requests waiting for dispatch
    pub fn queued_len(&self) -> usize {
        self.inner.lanes.lock().len()
    }

    /// Stop the dispatcher; queued requests resolve as cancelled
    pub fn shutdown(&self) {
        self.dispatcher.abort();
    }
}

impl Drop for RequestQueue {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

async fn dispatch_loop(inner: Arc<QueueInner>) {
    loop {
        let permit = match Arc::clone(&inner.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let pending = loop {
            let popped = { inner.lanes.lock().pop() };
            match popped {
                Some(pending) => break pending,
                None => inner.notify.notified().await,
            }
        };

        let router = Arc::clone(&inner.router);
        tokio::spawn(async move {
            let result = router.route(&pending.request).await;
            // the caller may have given up; a dropped receiver is fine
            let _ = pending.tx.send(result);
            drop(permit);
        });
    }
}
