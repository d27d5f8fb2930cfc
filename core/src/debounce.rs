//! Collapse bursts of calls into one delayed invocation.
//!
//! # Design
//! A `Debouncer` owns exactly one pending timer task. Every `call` aborts
//! the previous timer if it has not fired yet and spawns a new one, so at
//! most one invocation is ever scheduled. When a timer fires the operation
//! is spawned as its own task: later `call`s or `cancel`s only ever abort
//! the sleep, never an operation that is already running.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::task::JoinHandle;

type Operation<A> = Arc<dyn Fn(A) -> BoxFuture<'static, ()> + Send + Sync>;

/// Delays `operation` until `delay` has passed without another `call`.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<A> {
    delay: Duration,
    operation: Operation<A>,
    pending: Option<JoinHandle<()>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F, Fut>(delay: Duration, operation: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            operation: Arc::new(move |args| operation(args).boxed()),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any not-yet-fired invocation with one for `args`.
    pub fn call(&mut self, args: A) {
        self.cancel();
        let operation = Arc::clone(&self.operation);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(operation(args));
        }));
    }

    /// Drop the pending invocation. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
