use std::fmt;

/// A unit of work that is invoked exactly once.
///
/// Closures are covered by [`Task::new`]; implement this trait for types that carry their own state.
pub trait Runnable: Send + 'static {
    fn run(self: Box<Self>);
}

struct FnTask<F>(F);

impl<F> Runnable for FnTask<F>
where
    F: FnOnce() + Send + 'static,
{
    #[inline]
    fn run(self: Box<Self>) {
        (self.0)()
    }
}

/// Owned, single-invocation unit of work accepted by the executor.
pub struct Task {
    inner: Box<dyn Runnable>,
}

impl Task {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            inner: Box::new(FnTask(f)),
        }
    }

    /// Wrap any [`Runnable`].
    pub fn from_runnable<R: Runnable>(runnable: R) -> Self {
        Self {
            inner: Box::new(runnable),
        }
    }

    /// Wrap an already boxed [`Runnable`].
    pub fn from_boxed(inner: Box<dyn Runnable>) -> Self {
        Self { inner }
    }

    /// Consume the task and invoke it.
    #[inline]
    pub fn run(self) {
        self.inner.run()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}
