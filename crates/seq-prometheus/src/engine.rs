use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;
use seq_core::SequencedExecutor;
use tracing::{instrument, trace};

use crate::{error::MetricsError, set::ExecutorMetricSet};

/// Keeps an [`ExecutorMetricSet`] in step with a group of live executors.
pub struct MetricsEngine {
    set: ExecutorMetricSet,
    executors: Mutex<BTreeMap<String, Arc<SequencedExecutor>>>,
}

impl MetricsEngine {
    pub fn new(set: impl Into<String>) -> Self {
        Self::with_set(ExecutorMetricSet::new(set))
    }

    pub fn with_set(set: ExecutorMetricSet) -> Self {
        Self {
            set,
            executors: Mutex::new(BTreeMap::new()),
        }
    }

    #[inline]
    pub fn set(&self) -> &ExecutorMetricSet {
        &self.set
    }

    /// Register metrics for `executor` and track it for [`refresh`](Self::refresh).
    #[instrument(level = "debug", skip(self, executor), fields(set = %self.set.name(), executor = %executor.name()))]
    pub fn add_executor(&self, executor: Arc<SequencedExecutor>) -> Result<(), MetricsError> {
        let mut executors = self.executors.lock();
        let metrics = self.set.add(executor.name())?;
        metrics.update(&executor.stats());
        executors.insert(executor.name().to_string(), executor);
        Ok(())
    }

    pub fn remove_executor(&self, name: &str) -> Result<(), MetricsError> {
        let mut executors = self.executors.lock();
        self.set.remove(name)?;
        executors.remove(name);
        Ok(())
    }

    /// Drop every tracked executor and its metrics.
    pub fn clean(&self) {
        let mut executors = self.executors.lock();
        self.set.clean();
        executors.clear();
    }

    /// Publish the current stats of every tracked executor.
    pub fn refresh(&self) {
        let executors = self.executors.lock();
        for (name, executor) in executors.iter() {
            if let Some(metrics) = self.set.get(name) {
                metrics.update(&executor.stats());
            }
        }
        trace!(set = %self.set.name(), executors = executors.len(), "executor metrics refreshed");
    }
}
