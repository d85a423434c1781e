//! Cooperative stop flag with interruptible sleeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Stop request shared between the UI thread, the polling worker and the
/// input actuator.
///
/// [`ShutdownSignal::wait`] replaces `thread::sleep` wherever a pause must end
/// as soon as a stop is requested.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    stopped: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop and wake every waiter.
    pub fn trigger(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.stopped.store(true, Ordering::SeqCst);
        self.wake.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless a stop arrives first.
    ///
    /// Returns `true` when the wait ended because of a stop.
    pub fn wait(&self, duration: Duration) -> bool {
        if self.is_shutdown() {
            return true;
        }

        let guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (_guard, timeout) = self
            .wake
            .wait_timeout_while(guard, duration, |_| !self.is_shutdown())
            .unwrap_or_else(PoisonError::into_inner);

        !timeout.timed_out()
    }
}
