//! # Scan Queue and Worker Pool
//!
//! Accepts scan jobs (file quarantine candidates, network flow samples,
//! form submissions) from the rest of the system, holds them in a bounded
//! priority queue, and runs them through a fixed-size worker pool with a
//! per-job timeout.
//!
//! ## Design
//!
//! - [`queue::ScanQueue`] is a priority FIFO: highest priority first,
//!   insertion order preserved within a priority tier. Bounded capacity
//!   rejects new work rather than growing without limit.
//! - [`pool::ScanWorkerPool`] drains the queue with a fixed number of
//!   workers, enforcing a timeout per job and exposing completion/
//!   timeout/failure counters for observability.

mod error;
mod pool;
mod queue;

pub use error::{MonitorError, Result};
pub use pool::{PoolTelemetry, ScanWorkerPool};
pub use queue::{ScanPriority, ScanQueue};
