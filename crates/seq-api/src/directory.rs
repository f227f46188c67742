use std::{
    collections::BTreeMap,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;
use seq_core::{ExecutorStats, SequencedExecutor};
use tracing::debug;

use crate::error::ApiError;

/// Named executors visible to diagnostics.
///
/// Holds weak references: registering an executor does not keep it alive,
/// and dropped executors disappear from listings.
#[derive(Default)]
pub struct ExecutorDirectory {
    executors: RwLock<BTreeMap<String, Weak<SequencedExecutor>>>,
}

impl ExecutorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `executor` under its name.
    ///
    /// A name held by a dropped executor may be reused.
    pub fn register(&self, executor: &Arc<SequencedExecutor>) -> Result<(), ApiError> {
        let mut executors = self.executors.write();
        let name = executor.name();
        if executors.get(name).is_some_and(|e| e.strong_count() > 0) {
            return Err(ApiError::Duplicate(name.to_string()));
        }
        executors.insert(name.to_string(), Arc::downgrade(executor));
        debug!(executor = name, "executor registered for diagnostics");
        Ok(())
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.executors.write().remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<SequencedExecutor>> {
        self.executors.read().get(name).and_then(Weak::upgrade)
    }

    /// Stats of every live executor, ordered by name.
    pub fn stats(&self) -> Vec<ExecutorStats> {
        self.executors
            .read()
            .values()
            .filter_map(Weak::upgrade)
            .map(|e| e.stats())
            .collect()
    }

    /// Forget executors that have been dropped; returns how many were removed.
    pub fn prune(&self) -> usize {
        let mut executors = self.executors.write();
        let before = executors.len();
        executors.retain(|_, e| e.strong_count() > 0);
        before - executors.len()
    }

    pub fn len(&self) -> usize {
        self.executors
            .read()
            .values()
            .filter(|e| e.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
