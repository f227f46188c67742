//! The single consumer.
//!
//! Pulls tasks in FIFO order and runs them one at a time outside the state lock.
//! A pending capacity change is applied only when the worker finds the queue empty.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Duration,
};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, error, info_span, trace, warn};

use crate::{
    capacity::CapacityController,
    config::watermark_for,
    queue::BoundedQueue,
    stats::{Counters, WorkerState},
    task::Task,
};

/// State shared between producers and the worker.
pub(crate) struct Shared {
    pub name: String,
    pub state: Mutex<State>,
    /// Signals the worker: a task arrived, a resize was requested, or shutdown started.
    pub consumer: Condvar,
    /// Signals blocked producers: room freed, a resize was applied, or shutdown started.
    pub producer: Condvar,
    /// Signals `sync` callers once the worker has stopped.
    pub stopped: Condvar,
    pub watermark_ratio: f64,
    pub idle_timeout: Option<Duration>,
}

pub(crate) struct State {
    pub queue: BoundedQueue,
    pub capacity: CapacityController,
    pub watermark: u32,
    pub closed: bool,
    pub worker: WorkerState,
    pub producers_waiting: usize,
    pub consumer_waiting: bool,
    pub counters: Counters,
}

impl State {
    pub fn new(capacity: CapacityController, watermark_ratio: f64) -> Self {
        let applied = capacity.applied();
        Self {
            queue: BoundedQueue::new(applied),
            capacity,
            watermark: watermark_for(applied, watermark_ratio),
            closed: false,
            worker: WorkerState::Idle,
            producers_waiting: 0,
            consumer_waiting: false,
            counters: Counters::default(),
        }
    }
}

pub(crate) fn run(shared: Arc<Shared>) {
    let span = info_span!("worker", executor = %shared.name);
    let _enter = span.enter();
    debug!("worker started");

    let mut state = shared.state.lock();
    loop {
        if let Some(task) = state.queue.pop() {
            state.worker = WorkerState::Running;
            if state.producers_waiting > 0 && state.queue.len() <= state.watermark as usize {
                shared.producer.notify_all();
            }

            let completed = MutexGuard::unlocked(&mut state, || run_task(task));

            state.counters.executed += 1;
            if !completed {
                state.counters.failed += 1;
            }
            continue;
        }

        if state.capacity.pending().is_some() {
            apply_resize(&shared, &mut state);
        }
        if state.closed {
            break;
        }

        state.worker = WorkerState::Idle;
        state.consumer_waiting = true;
        match shared.idle_timeout {
            Some(timeout) => {
                shared.consumer.wait_for(&mut state, timeout);
            }
            None => shared.consumer.wait(&mut state),
        }
        state.consumer_waiting = false;
        state.counters.wakeups += 1;
    }

    state.worker = WorkerState::Stopped;
    shared.stopped.notify_all();
    shared.producer.notify_all();
    debug!(executed = state.counters.executed, "worker stopped");
}

/// Swap the queue storage for the pending capacity. The queue must be empty.
fn apply_resize(shared: &Shared, state: &mut State) {
    let Some(limit) = state.capacity.pending() else {
        return;
    };
    state.worker = WorkerState::Resizing;

    if let Err(e) = state.queue.reallocate(limit) {
        warn!(error = %e, "task limit change deferred");
        return;
    }
    let previous = state.capacity.applied();
    state.capacity.take_pending();
    state.watermark = watermark_for(limit, shared.watermark_ratio);
    state.counters.resizes += 1;

    debug!(previous, task_limit = limit, watermark = state.watermark, "task limit applied");
    shared.producer.notify_all();
}

/// Run one task, containing any panic. Returns `false` if the task panicked.
fn run_task(task: Task) -> bool {
    trace!("running task");
    match panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
        Ok(()) => true,
        Err(payload) => {
            error!(panic = panic_message(payload.as_ref()), "task panicked");
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
