//! Prometheus metrics for sequenced executors.
//!
//! Every executor gets its own group of gauges and counters inside an [`ExecutorMetricSet`],
//! const-labelled with the set and executor names.
//! [`MetricsEngine`] keeps the set in step with a group of live executors.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use seq_core::SequencedExecutor;
//! use seq_prometheus::MetricsEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = MetricsEngine::new("indexing");
//! let executor = Arc::new(SequencedExecutor::with_limit("feed", 64)?);
//! engine.add_executor(Arc::clone(&executor))?;
//!
//! engine.refresh();
//! let families = engine.set().gather();
//! assert!(!families.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `seq_executor_task_limit{set, executor}` - Gauge
//! - `seq_executor_queue_size{set, executor}` - Gauge
//! - `seq_executor_max_queue_size{set, executor}` - Gauge
//! - `seq_executor_accepted_tasks_total{set, executor}` - Counter
//! - `seq_executor_rejected_tasks_total{set, executor}` - Counter
//! - `seq_executor_executed_tasks_total{set, executor}` - Counter
//! - `seq_executor_failed_tasks_total{set, executor}` - Counter
//! - `seq_executor_wakeups_total{set, executor}` - Counter
//! - `seq_executor_resizes_total{set, executor}` - Counter

mod engine;
pub use engine::MetricsEngine;

mod error;
pub use error::MetricsError;

mod set;
pub use set::{ExecutorMetricSet, ExecutorMetrics};

pub use prometheus::{Encoder, Registry, TextEncoder};
