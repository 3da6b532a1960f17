//! Exactly-once delivery of an asynchronous outcome.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// Holds the outcome of an asynchronous request.
///
/// The first delivery wins; later deliveries are rejected and dropped, so a
/// response and a failure can race without both reaching the caller.
#[derive(Debug)]
pub struct Completion<T> {
    finished: AtomicBool,
    outcome: Mutex<Option<T>>,
}

impl<T> Default for Completion<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Completion<T> {
    pub fn new() -> Self {
        Self {
            finished: AtomicBool::new(false),
            outcome: Mutex::new(None),
        }
    }

    /// Deliver an outcome; returns `false` if one was already delivered.
    pub fn deliver(&self, outcome: T) -> bool {
        let mut slot = self.outcome.lock();
        if self.finished.load(Ordering::Acquire) {
            tracing::debug!("dropping duplicate completion");
            return false;
        }
        *slot = Some(outcome);
        // set under the lock, after the outcome is stored
        self.finished.store(true, Ordering::Release);
        true
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn take(&self) -> Option<T> {
        self.outcome.lock().take()
    }
}
