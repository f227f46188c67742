use std::{
    sync::Arc,
    thread::{self, JoinHandle, ThreadId},
    time::{Duration, Instant},
};

use parking_lot::Condvar;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::{
    barrier::Latch,
    capacity::CapacityController,
    config::ExecutorConfig,
    error::{ExecutorError, SubmitError},
    stats::{ExecutorStats, WorkerState},
    task::Task,
    worker::{self, Shared, State},
};

/// Multi-producer, single-consumer executor with a bounded, resizable queue.
///
/// Tasks run one at a time, in the order they were queued, on a dedicated worker thread.
/// Producers block while the queue is full.
///
/// Dropping the executor stops admission, lets the worker run every queued task, and joins it.
pub struct SequencedExecutor {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    worker_id: ThreadId,
}

impl SequencedExecutor {
    /// Start an executor; the worker thread is named after `config.name`.
    #[instrument(level = "debug", skip(config), fields(name = %config.name, task_limit = config.task_limit))]
    pub fn new(config: ExecutorConfig) -> Result<Self, ExecutorError> {
        config.validate()?;

        let capacity = CapacityController::new(config.task_limit);
        let watermark_ratio = config.watermark_ratio();
        let shared = Arc::new(Shared {
            name: config.name.clone(),
            state: parking_lot::Mutex::new(State::new(capacity, watermark_ratio)),
            consumer: Condvar::new(),
            producer: Condvar::new(),
            stopped: Condvar::new(),
            watermark_ratio,
            idle_timeout: config.idle_timeout(),
        });

        let runner = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(config.name.clone())
            .spawn(move || worker::run(runner))?;
        let worker_id = handle.thread().id();

        info!(
            executor = %config.name,
            task_limit = capacity.applied(),
            "executor started"
        );
        Ok(Self {
            shared,
            worker: Some(handle),
            worker_id,
        })
    }

    /// Start an executor with default watermark and no idle timeout.
    pub fn with_limit(name: impl Into<String>, task_limit: u32) -> Result<Self, ExecutorError> {
        Self::new(ExecutorConfig::new(name, task_limit))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Queue a task, blocking while the queue is full.
    ///
    /// Fire-and-forget: a task rejected because the executor is shut down is logged and dropped.
    ///
    /// A full queue normally never drops a task. The one exception is a task running on this
    /// executor's worker that submits while the queue is full: blocking there would wait on
    /// itself forever, so the task is logged, counted as rejected and dropped instead.
    /// Use [`try_execute_for`](Self::try_execute_for) from inside tasks to get it back as
    /// [`SubmitError::WouldDeadlock`].
    pub fn execute(&self, task: Task) {
        if let Err(err) = self.submit(task, None) {
            warn!(executor = %self.shared.name, error = %err, "task rejected");
        }
    }

    /// Queue a task, waiting at most `timeout` for room.
    pub fn try_execute_for(&self, task: Task, timeout: Duration) -> Result<(), SubmitError> {
        self.submit(task, Some(timeout))
    }

    /// Block until every task queued before this call has run.
    ///
    /// After shutdown this waits for the worker to drain and stop.
    pub fn sync(&self) {
        if self.on_worker() {
            warn!(executor = %self.shared.name, "sync called from the worker thread; not waiting");
            return;
        }

        let latch = Arc::new(Latch::new());
        let signal = Arc::clone(&latch);
        match self.submit(Task::new(move || signal.open()), None) {
            Ok(()) => latch.wait(),
            Err(_) => self.wait_stopped(),
        }
    }

    /// Request a new queue capacity, rounded up to a power of two.
    ///
    /// Zero is treated as one; requests above [`MAX_TASK_LIMIT`](crate::capacity::MAX_TASK_LIMIT) are clamped to it.
    ///
    /// The change takes effect once the worker finds the queue empty.
    /// Until then [`task_limit`](Self::task_limit) keeps reporting the old capacity
    /// and new submissions wait so that the queue can drain.
    pub fn set_task_limit(&self, task_limit: u32) {
        let mut state = self.shared.state.lock();
        if !state.capacity.request(task_limit) {
            return;
        }

        debug!(
            executor = %self.shared.name,
            requested = task_limit,
            applied = state.capacity.applied(),
            pending = ?state.capacity.pending(),
            "task limit change requested"
        );
        if state.capacity.pending().is_none() {
            self.shared.producer.notify_all();
        } else if state.consumer_waiting && state.queue.is_empty() {
            self.shared.consumer.notify_one();
        }
    }

    /// Currently applied queue capacity.
    pub fn task_limit(&self) -> u32 {
        self.shared.state.lock().capacity.applied()
    }

    pub fn stats(&self) -> ExecutorStats {
        let state = self.shared.state.lock();
        let counters = state.counters;
        ExecutorStats {
            name: self.shared.name.clone(),
            task_limit: state.capacity.applied(),
            pending_task_limit: state.capacity.pending(),
            queue_size: state.queue.len(),
            max_queue_size: counters.max_queue_size,
            accepted_tasks: counters.accepted,
            rejected_tasks: counters.rejected,
            executed_tasks: counters.executed,
            failed_tasks: counters.failed,
            resizes: counters.resizes,
            wakeups: counters.wakeups,
            state: state.worker,
        }
    }

    /// Stop accepting tasks. Already queued tasks still run.
    pub fn shutdown(&self) {
        let mut state = self.shared.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;

        info!(executor = %self.shared.name, queued = state.queue.len(), "executor shutting down");
        self.shared.consumer.notify_all();
        self.shared.producer.notify_all();
    }

    fn submit(&self, task: Task, timeout: Option<Duration>) -> Result<(), SubmitError> {
        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let on_worker = self.on_worker();

        let mut task = task;
        let mut state = self.shared.state.lock();
        loop {
            if state.closed {
                state.counters.rejected += 1;
                return Err(SubmitError::Closed(task));
            }

            // A pending resize holds producers back until the worker has drained the queue.
            // The worker itself is exempt: it cannot drain while it waits.
            if on_worker || state.capacity.pending().is_none() {
                match state.queue.push(task) {
                    Ok(()) => break,
                    Err(back) => task = back,
                }
                if on_worker {
                    state.counters.rejected += 1;
                    return Err(SubmitError::WouldDeadlock(task));
                }
            }

            if let Some((deadline, waited)) = deadline
                && Instant::now() >= deadline
            {
                state.counters.rejected += 1;
                return Err(SubmitError::Timeout(task, waited));
            }

            state.producers_waiting += 1;
            match deadline {
                Some((deadline, _)) => {
                    self.shared.producer.wait_until(&mut state, deadline);
                }
                None => self.shared.producer.wait(&mut state),
            }
            state.producers_waiting -= 1;
        }

        state.counters.accepted += 1;
        state.counters.max_queue_size = state.counters.max_queue_size.max(state.queue.len());
        trace!(queued = state.queue.len(), "task queued");

        if state.consumer_waiting {
            self.shared.consumer.notify_one();
        }
        Ok(())
    }

    fn wait_stopped(&self) {
        let mut state = self.shared.state.lock();
        while state.worker != WorkerState::Stopped {
            self.shared.stopped.wait(&mut state);
        }
    }

    #[inline]
    fn on_worker(&self) -> bool {
        thread::current().id() == self.worker_id
    }
}

impl Drop for SequencedExecutor {
    fn drop(&mut self) {
        self.shutdown();

        let Some(handle) = self.worker.take() else {
            return;
        };
        // Dropped from inside one of its own tasks: the worker finishes on its own.
        if self.on_worker() {
            return;
        }
        if handle.join().is_err() {
            error!(executor = %self.shared.name, "worker thread panicked");
        }
    }
}
