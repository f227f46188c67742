use serde::{Deserialize, Serialize};

/// What the worker thread is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkerState {
    /// Waiting for a task.
    #[default]
    Idle,
    /// Executing a task.
    Running,
    /// Swapping queue storage for a new capacity.
    Resizing,
    /// Drained after shutdown and exited.
    Stopped,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Idle => "idle",
            WorkerState::Running => "running",
            WorkerState::Resizing => "resizing",
            WorkerState::Stopped => "stopped",
        }
    }
}

/// Monotonic counters kept under the executor lock.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub accepted: u64,
    pub rejected: u64,
    pub executed: u64,
    pub failed: u64,
    pub resizes: u64,
    pub wakeups: u64,
    pub max_queue_size: usize,
}

/// Point-in-time view of an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorStats {
    pub name: String,
    pub task_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_task_limit: Option<u32>,
    pub queue_size: usize,
    pub max_queue_size: usize,
    pub accepted_tasks: u64,
    pub rejected_tasks: u64,
    pub executed_tasks: u64,
    /// Tasks that panicked; also counted in `executed_tasks`.
    pub failed_tasks: u64,
    pub resizes: u64,
    pub wakeups: u64,
    pub state: WorkerState,
}
