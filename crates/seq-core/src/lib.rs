//! Sequenced task execution.
//!
//! A [`SequencedExecutor`] runs submitted [`Task`]s one at a time, in submission order, on a single dedicated worker thread.
//! The queue in front of the worker is bounded (a power of two) and can be resized while producers and the worker are active.

pub mod barrier;
pub mod capacity;
pub mod config;
pub mod error;
pub mod executor;
pub mod queue;
pub mod stats;
pub mod task;
mod worker;

pub use barrier::Latch;
pub use capacity::{CapacityController, MAX_TASK_LIMIT, round_up_pow2};
pub use config::ExecutorConfig;
pub use error::{ExecutorError, SubmitError};
pub use executor::SequencedExecutor;
pub use queue::BoundedQueue;
pub use stats::{ExecutorStats, WorkerState};
pub use task::{Runnable, Task};

pub mod prelude {
    pub use crate::config::ExecutorConfig;
    pub use crate::error::{ExecutorError, SubmitError};
    pub use crate::executor::SequencedExecutor;
    pub use crate::task::{Runnable, Task};
}
