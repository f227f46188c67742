use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;
use prometheus::{IntCounter, IntGauge, Opts, Registry, core::Collector, proto::MetricFamily};
use seq_core::ExecutorStats;
use tracing::{debug, warn};

use crate::error::MetricsError;

/// Gauges and counters for one executor.
pub struct ExecutorMetrics {
    task_limit: IntGauge,
    queue_size: IntGauge,
    max_queue_size: IntGauge,
    accepted: IntCounter,
    rejected: IntCounter,
    executed: IntCounter,
    failed: IntCounter,
    wakeups: IntCounter,
    resizes: IntCounter,
}

impl ExecutorMetrics {
    fn new(set: &str, executor: &str) -> Result<Self, prometheus::Error> {
        let opts = |name: &str, help: &str| {
            Opts::new(name, help)
                .const_label("set", set)
                .const_label("executor", executor)
        };
        Ok(Self {
            task_limit: IntGauge::with_opts(opts(
                "seq_executor_task_limit",
                "Applied queue capacity",
            ))?,
            queue_size: IntGauge::with_opts(opts(
                "seq_executor_queue_size",
                "Tasks waiting in the queue",
            ))?,
            max_queue_size: IntGauge::with_opts(opts(
                "seq_executor_max_queue_size",
                "Largest queue length observed",
            ))?,
            accepted: IntCounter::with_opts(opts(
                "seq_executor_accepted_tasks_total",
                "Tasks accepted into the queue",
            ))?,
            rejected: IntCounter::with_opts(opts(
                "seq_executor_rejected_tasks_total",
                "Tasks refused by the executor",
            ))?,
            executed: IntCounter::with_opts(opts(
                "seq_executor_executed_tasks_total",
                "Tasks run by the worker",
            ))?,
            failed: IntCounter::with_opts(opts(
                "seq_executor_failed_tasks_total",
                "Tasks that panicked",
            ))?,
            wakeups: IntCounter::with_opts(opts(
                "seq_executor_wakeups_total",
                "Times the idle worker woke up",
            ))?,
            resizes: IntCounter::with_opts(opts(
                "seq_executor_resizes_total",
                "Queue capacity changes applied",
            ))?,
        })
    }

    fn collectors(&self) -> Vec<Box<dyn Collector>> {
        vec![
            Box::new(self.task_limit.clone()),
            Box::new(self.queue_size.clone()),
            Box::new(self.max_queue_size.clone()),
            Box::new(self.accepted.clone()),
            Box::new(self.rejected.clone()),
            Box::new(self.executed.clone()),
            Box::new(self.failed.clone()),
            Box::new(self.wakeups.clone()),
            Box::new(self.resizes.clone()),
        ]
    }

    /// Publish a stats snapshot.
    ///
    /// Counters only move forward; a snapshot older than the last one leaves them unchanged.
    pub fn update(&self, stats: &ExecutorStats) {
        self.task_limit.set(i64::from(stats.task_limit));
        self.queue_size.set(stats.queue_size as i64);
        self.max_queue_size.set(stats.max_queue_size as i64);

        advance(&self.accepted, stats.accepted_tasks);
        advance(&self.rejected, stats.rejected_tasks);
        advance(&self.executed, stats.executed_tasks);
        advance(&self.failed, stats.failed_tasks);
        advance(&self.wakeups, stats.wakeups);
        advance(&self.resizes, stats.resizes);
    }
}

#[inline]
fn advance(counter: &IntCounter, total: u64) {
    let delta = total.saturating_sub(counter.get());
    if delta > 0 {
        counter.inc_by(delta);
    }
}

/// Named group of per-executor metrics registered in one [`Registry`].
pub struct ExecutorMetricSet {
    name: String,
    registry: Registry,
    children: Mutex<BTreeMap<String, Arc<ExecutorMetrics>>>,
}

impl ExecutorMetricSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, Registry::new())
    }

    /// Share an existing registry, e.g. the one served on `/metrics`.
    pub fn with_registry(name: impl Into<String>, registry: Registry) -> Self {
        Self {
            name: name.into(),
            registry,
            children: Mutex::new(BTreeMap::new()),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register metrics for `executor`.
    pub fn add(&self, executor: &str) -> Result<Arc<ExecutorMetrics>, MetricsError> {
        let mut children = self.children.lock();
        if children.contains_key(executor) {
            return Err(MetricsError::Duplicate(executor.to_string()));
        }

        let metrics = Arc::new(ExecutorMetrics::new(&self.name, executor)?);
        for (idx, collector) in metrics.collectors().into_iter().enumerate() {
            if let Err(e) = self.registry.register(collector) {
                for done in metrics.collectors().into_iter().take(idx) {
                    let _ = self.registry.unregister(done);
                }
                return Err(e.into());
            }
        }

        children.insert(executor.to_string(), Arc::clone(&metrics));
        debug!(set = %self.name, executor, "executor metrics added");
        Ok(metrics)
    }

    /// Unregister the metrics for `executor`.
    pub fn remove(&self, executor: &str) -> Result<(), MetricsError> {
        let metrics = self
            .children
            .lock()
            .remove(executor)
            .ok_or_else(|| MetricsError::UnknownExecutor(executor.to_string()))?;

        self.unregister(executor, &metrics);
        debug!(set = %self.name, executor, "executor metrics removed");
        Ok(())
    }

    /// Unregister every executor's metrics.
    pub fn clean(&self) {
        let children = std::mem::take(&mut *self.children.lock());
        for (executor, metrics) in &children {
            self.unregister(executor, metrics);
        }
        debug!(set = %self.name, removed = children.len(), "executor metrics cleaned");
    }

    pub fn get(&self, executor: &str) -> Option<Arc<ExecutorMetrics>> {
        self.children.lock().get(executor).cloned()
    }

    /// Number of executors with registered metrics.
    pub fn registered_count(&self) -> usize {
        self.children.lock().len()
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    fn unregister(&self, executor: &str, metrics: &ExecutorMetrics) {
        for collector in metrics.collectors() {
            if let Err(e) = self.registry.unregister(collector) {
                warn!(set = %self.name, executor, error = %e, "failed to unregister metric");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{Encoder, TextEncoder};
    use seq_core::WorkerState;

    fn render(set: &ExecutorMetricSet) -> String {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&set.gather(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn stats(accepted: u64) -> ExecutorStats {
        ExecutorStats {
            name: "feed".into(),
            task_limit: 32,
            pending_task_limit: None,
            queue_size: 4,
            max_queue_size: 12,
            accepted_tasks: accepted,
            rejected_tasks: 1,
            executed_tasks: accepted.saturating_sub(4),
            failed_tasks: 0,
            resizes: 2,
            wakeups: 5,
            state: WorkerState::Running,
        }
    }

    #[test]
    fn executor_metrics_can_be_added() {
        let set = ExecutorMetricSet::new("parent");
        assert_eq!(set.registered_count(), 0);

        set.add("foo").unwrap();
        assert_eq!(set.registered_count(), 1);
        assert!(set.get("foo").is_some());
    }

    #[test]
    fn executor_metrics_can_be_removed() {
        let set = ExecutorMetricSet::new("parent");
        set.add("foo").unwrap();
        set.add("bar").unwrap();
        assert_eq!(set.registered_count(), 2);

        set.remove("foo").unwrap();
        assert_eq!(set.registered_count(), 1);
        assert!(set.get("foo").is_none());
        assert!(set.get("bar").is_some());
        assert!(!render(&set).contains(r#"executor="foo""#));
    }

    #[test]
    fn all_executor_metrics_can_be_cleaned() {
        let set = ExecutorMetricSet::new("parent");
        set.add("foo").unwrap();
        set.add("bar").unwrap();

        set.clean();
        assert_eq!(set.registered_count(), 0);
        assert!(set.get("foo").is_none());
        assert!(set.get("bar").is_none());
        assert!(set.gather().is_empty());
    }

    #[test]
    fn duplicate_and_unknown_are_errors() {
        let set = ExecutorMetricSet::new("parent");
        set.add("foo").unwrap();

        assert!(matches!(set.add("foo"), Err(MetricsError::Duplicate(_))));
        assert!(matches!(set.remove("bar"), Err(MetricsError::UnknownExecutor(_))));
    }

    #[test]
    fn removed_executor_can_be_added_again() {
        let set = ExecutorMetricSet::new("parent");
        set.add("foo").unwrap();
        set.remove("foo").unwrap();
        set.add("foo").unwrap();
        assert_eq!(set.registered_count(), 1);
    }

    #[test]
    fn update_publishes_stats() {
        let set = ExecutorMetricSet::new("parent");
        let metrics = set.add("feed").unwrap();

        metrics.update(&stats(10));
        assert_eq!(metrics.task_limit.get(), 32);
        assert_eq!(metrics.queue_size.get(), 4);
        assert_eq!(metrics.accepted.get(), 10);
        assert_eq!(metrics.executed.get(), 6);
        assert_eq!(metrics.resizes.get(), 2);

        metrics.update(&stats(25));
        assert_eq!(metrics.accepted.get(), 25);

        metrics.update(&stats(20));
        assert_eq!(metrics.accepted.get(), 25);

        let text = render(&set);
        assert!(text.contains("seq_executor_accepted_tasks_total"));
        assert!(text.contains(r#"set="parent""#));
    }
}
