/// Largest capacity a queue can be given.
///
/// Queue slots are allocated up front, so this caps a queue at 64 MiB of slots.
pub const MAX_TASK_LIMIT: u32 = 1 << 22;

/// Round `n` up to the next power of two.
///
/// Zero maps to `1`; values above [`MAX_TASK_LIMIT`] are clamped to it.
#[inline]
pub fn round_up_pow2(n: u32) -> u32 {
    n.clamp(1, MAX_TASK_LIMIT).next_power_of_two()
}

/// Applied and requested queue capacity.
///
/// `pending` is never equal to `applied`; it is consumed by the worker once the queue has drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityController {
    applied: u32,
    pending: Option<u32>,
}

impl CapacityController {
    pub fn new(initial: u32) -> Self {
        Self {
            applied: round_up_pow2(initial),
            pending: None,
        }
    }

    /// Capacity the queue currently has.
    #[inline]
    pub fn applied(&self) -> u32 {
        self.applied
    }

    /// Capacity waiting to be applied, if any.
    #[inline]
    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    /// Record a capacity request.
    ///
    /// Only the most recent request is kept; a request that rounds to the applied capacity cancels an earlier one.
    /// Returns `true` when the pending request changed.
    pub fn request(&mut self, n: u32) -> bool {
        let wanted = round_up_pow2(n);
        let next = (wanted != self.applied).then_some(wanted);
        let changed = next != self.pending;
        self.pending = next;
        changed
    }

    /// Promote the pending request to the applied capacity and return it.
    ///
    /// Must only be called by the worker while the queue is empty.
    pub fn take_pending(&mut self) -> Option<u32> {
        let next = self.pending.take()?;
        self.applied = next;
        Some(next)
    }
}
