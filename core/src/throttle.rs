//! Rate-limit an operation to at most one call per window.

use std::time::Duration;

use tokio::time::Instant;

/// Runs the first call of each window immediately and drops the rest.
///
/// Calls that arrive while locked are neither queued nor merged; the window
/// only restarts on the next call after the lock expires.
pub struct Throttle<A> {
    window: Duration,
    operation: Box<dyn FnMut(A) + Send>,
    locked_until: Option<Instant>,
}

impl<A> Throttle<A> {
    pub fn new<F>(window: Duration, operation: F) -> Self
    where
        F: FnMut(A) + Send + 'static,
    {
        Self {
            window,
            operation: Box::new(operation),
            locked_until: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` if `operation` ran.
    pub fn call(&mut self, args: A) -> bool {
        let now = Instant::now();
        if self.locked_until.is_some_and(|until| now < until) {
            return false;
        }
        (self.operation)(args);
        self.locked_until = Some(now + self.window);
        true
    }

    pub fn is_locked(&self) -> bool {
        self.locked_until.is_some_and(|until| Instant::now() < until)
    }
}
