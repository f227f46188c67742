use std::time::Duration;

use thiserror::Error;

use crate::task::Task;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("invalid executor config: {0}")]
    InvalidConfig(String),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("queue holds {len} tasks; capacity can only change while empty")]
    ResizeNotEmpty { len: usize },
}

/// A task the executor refused to queue.
///
/// Every variant hands the task back to the caller.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("executor is shut down")]
    Closed(Task),
    #[error("no room in queue after {1:?}")]
    Timeout(Task, Duration),
    #[error("worker cannot wait for room in its own full queue")]
    WouldDeadlock(Task),
}

impl SubmitError {
    pub fn into_task(self) -> Task {
        match self {
            SubmitError::Closed(task)
            | SubmitError::Timeout(task, _)
            | SubmitError::WouldDeadlock(task) => task,
        }
    }
}
