//! Attempt logging and derived usage metrics
//!
//! Every provider invocation, successful or not, produces one
//! [`AttemptRecord`]. Records flow through a bounded channel into an
//! in-memory ring buffer capped at [`MAX_ATTEMPT_RECORDS`] entries (FIFO
//! eviction), so the log can never grow without bound and a slow consumer
//! can never stall request routing: when the channel is full the entry is
//! dropped with a warning.
//!
//! Aggregates are recomputed on demand from the buffer, which keeps them
//! trivially consistent with the log contents.

pub mod types;

pub use types::{AttemptRecord, CostMetrics, FallbackMetrics, ProviderStatistics};

use parking_lot::RwLock;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;


/// Retention cap for the attempt log. A design constant, not runtime
/// configuration.
pub const MAX_ATTEMPT_RECORDS: usize = 1000;

/// Capacity of the channel between callers and the drain task
const CHANNEL_CAPACITY: usize = 256;

enum LogMessage {
    Record(AttemptRecord),
    Flush(oneshot::Sender<()>),
}

/// Handle to the usage log
///
/// Cheap to clone; all clones share one ring buffer. Must be created inside
/// a tokio runtime (it spawns the drain task).
#[derive(Clone)]
pub struct UsageLogger {
    tx: mpsc::Sender<LogMessage>,
    store: Arc<RwLock<VecDeque<AttemptRecord>>>,
}

impl UsageLogger {
    /// Create a logger and spawn its drain task
    pub fn new() -> Self {
        let store = Arc::new(RwLock::new(VecDeque::with_capacity(MAX_ATTEMPT_RECORDS)));
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);

        let drain_store = Arc::clone(&store);
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    LogMessage::Record(record) => {
                        let mut log = drain_store.write();
                        if log.len() >= MAX_ATTEMPT_RECORDS {
                            log.pop_front();
                        }
                        log.push_back(record);
                    }
                    LogMessage::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });

        Self { tx, store }
    }

    /// Append an attempt record
    ///
    /// Never blocks and never fails the caller: under extreme load the entry
    /// is dropped and a warning emitted instead.
    pub fn record(&self, record: AttemptRecord) {
        if let Err(e) = self.tx.try_send(LogMessage::Record(record)) {
            warn!("usage log entry dropped: {e}");
        }
    }

    /// Wait until every record sent before this call has been applied
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(LogMessage::Flush(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Number of records currently retained
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// The most recent records, newest first, capped at `limit`
    pub fn recent(&self, limit: usize) -> Vec<AttemptRecord> {
        self.store
            .read()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Aggregate statistics grouped by (provider, task type)
    ///
    /// Groups are returned sorted by provider id, then task type.
    pub fn model_stats(&self) -> Vec<ProviderStatistics> {
        #[derive(Default)]
        struct Accumulator {
            total_calls: u64,
            total_tokens: u64,
            successes: u64,
            avg_response_time_ms: f64,
            total_cost: f64,
        }

        let log = self.store.read();
        let mut groups: BTreeMap<(String, String), Accumulator> = BTreeMap::new();

        for record in log.iter() {
            let acc = groups
                .entry((record.provider_id.clone(), record.task_type.clone()))
                .or_default();
            acc.total_calls += 1;
            acc.total_tokens += record.tokens_used;
            acc.total_cost += record.cost;
            if record.success {
                acc.successes += 1;
            }
            // incremental running average: avg += (x - avg) / n
            acc.avg_response_time_ms += (record.response_time_ms as f64
                - acc.avg_response_time_ms)
                / acc.total_calls as f64;
        }

        groups
            .into_iter()
            .map(|((provider_id, task_type), acc)| ProviderStatistics {
                provider_id,
                task_type,
                total_calls: acc.total_calls,
                total_tokens: acc.total_tokens,
                avg_response_time_ms: acc.avg_response_time_ms,
                success_rate: percentage(acc.successes, acc.total_calls),
                total_cost: acc.total_cost,
            })
            .collect()
    }

    /// Fallback usage, partitioned by the per-attempt fallback flag
    pub fn fallback_metrics(&self) -> FallbackMetrics {
        let log = self.store.read();

        let mut total_fallbacks = 0u64;
        let mut by_reason: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_provider: BTreeMap<String, u64> = BTreeMap::new();
        let mut with = MeanTracker::default();
        let mut without = MeanTracker::default();

        for record in log.iter() {
            if record.fallback {
                total_fallbacks += 1;
                let reason = record
                    .fallback_reason
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string());
                *by_reason.entry(reason).or_insert(0) += 1;
                *by_provider.entry(record.provider_id.clone()).or_insert(0) += 1;
                with.push(record.response_time_ms as f64);
            } else {
                without.push(record.response_time_ms as f64);
            }
        }

        FallbackMetrics {
            total_fallbacks,
            fallbacks_by_reason: by_reason,
            fallbacks_by_provider: by_provider,
            avg_response_time_with_fallback_ms: with.mean(),
            avg_response_time_without_fallback_ms: without.mean(),
        }
    }

    /// Cost totals, broken down by day, provider, and task type
    pub fn cost_metrics(&self) -> CostMetrics {
        let log = self.store.read();

        let mut total_cost = 0.0;
        let mut by_day: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_provider: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_task: BTreeMap<String, f64> = BTreeMap::new();

        for record in log.iter() {
            total_cost += record.cost;
            *by_day
                .entry(record.timestamp.format("%Y-%m-%d").to_string())
                .or_insert(0.0) += record.cost;
            *by_provider.entry(record.provider_id.clone()).or_insert(0.0) += record.cost;
            *by_task.entry(record.task_type.clone()).or_insert(0.0) += record.cost;
        }

        CostMetrics {
            total_cost,
            cost_by_day: by_day,
            cost_by_provider: by_provider,
            cost_by_task: by_task,
        }
    }
}

impl Default for UsageLogger {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Incremental mean over a stream of samples
#[derive(Default)]
struct MeanTracker {
    count: u64,
    mean: f64,
}

impl MeanTracker {
    fn push(&mut self, sample: f64) {
        self.count += 1;
        self.mean += (sample - self.mean) / self.count as f64;
    }

    fn mean(&self) -> f64 {
        self.mean
    }
}
