use crate::{capacity::round_up_pow2, error::ExecutorError, task::Task};

/// Fixed-capacity FIFO ring of tasks.
///
/// Capacity is a power of two so positions wrap with a mask.
/// Not synchronized; the executor keeps it behind its state lock.
pub struct BoundedQueue {
    slots: Box<[Option<Task>]>,
    mask: u64,
    read: u64,
    write: u64,
}

impl BoundedQueue {
    pub fn new(capacity: u32) -> Self {
        let capacity = round_up_pow2(capacity);
        Self {
            slots: empty_slots(capacity),
            mask: u64::from(capacity) - 1,
            read: 0,
            write: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        (self.write - self.read) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.slots.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Append a task, handing it back when the queue is full.
    pub fn push(&mut self, task: Task) -> Result<(), Task> {
        if self.is_full() {
            return Err(task);
        }
        let idx = (self.write & self.mask) as usize;
        self.slots[idx] = Some(task);
        self.write += 1;
        Ok(())
    }

    /// Remove the oldest task.
    pub fn pop(&mut self) -> Option<Task> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.read & self.mask) as usize;
        self.read += 1;
        self.slots[idx].take()
    }

    /// Replace the backing storage with one of a new capacity.
    ///
    /// Only allowed while empty, so no task ever moves between ring layouts.
    pub fn reallocate(&mut self, capacity: u32) -> Result<(), ExecutorError> {
        if !self.is_empty() {
            return Err(ExecutorError::ResizeNotEmpty { len: self.len() });
        }
        let capacity = round_up_pow2(capacity);
        self.slots = empty_slots(capacity);
        self.mask = u64::from(capacity) - 1;
        self.read = 0;
        self.write = 0;
        Ok(())
    }
}

fn empty_slots(capacity: u32) -> Box<[Option<Task>]> {
    (0..capacity).map(|_| None).collect()
}
