use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Single-use completion token.
///
/// Once opened it stays open; every current and future waiter returns immediately.
#[derive(Default)]
pub struct Latch {
    open: Mutex<bool>,
    cond: Condvar,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        let mut open = self.open.lock();
        *open = true;
        self.cond.notify_all();
    }

    pub fn is_open(&self) -> bool {
        *self.open.lock()
    }

    /// Block until [`Latch::open`] has been called.
    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.cond.wait(&mut open);
        }
    }

    /// Block for at most `timeout`; returns whether the latch opened.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut open = self.open.lock();
        while !*open {
            if self.cond.wait_until(&mut open, deadline).timed_out() {
                break;
            }
        }
        *open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread};

    #[test]
    fn wait_returns_after_open() {
        let latch = Arc::new(Latch::new());
        let opener = Arc::clone(&latch);

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            opener.open();
        });

        latch.wait();
        assert!(latch.is_open());
        handle.join().unwrap();
    }

    #[test]
    fn wait_for_times_out_when_closed() {
        let latch = Latch::new();
        assert!(!latch.wait_for(Duration::from_millis(5)));
        assert!(!latch.is_open());
    }

    #[test]
    fn stays_open() {
        let latch = Latch::new();
        latch.open();
        latch.wait();
        assert!(latch.wait_for(Duration::ZERO));
    }
}
