//! Usage monitoring
//!
//! Bounded attempt logging and the aggregate views derived from it.

pub mod usage;

pub use usage::{
    AttemptRecord, CostMetrics, FallbackMetrics, ProviderStatistics, UsageLogger,
};
