//! Request slots for marshaled invocations.

use std::ops::{Deref, DerefMut};

use icegen_core::OperationMode;
use parking_lot::Mutex;

use crate::OutputStream;

/// One outgoing request being marshaled.
#[derive(Debug, Default)]
pub struct Outgoing {
    pub operation: String,
    pub mode: OperationMode,
    pub os: OutputStream,
}

/// A pool of reusable request slots.
///
/// Slots are handed out as guards and go back to the pool when the guard is
/// dropped, whichever way the invocation ends.
#[derive(Debug, Default)]
pub struct OutgoingPool {
    free: Mutex<Vec<Outgoing>>,
    in_use: Mutex<usize>,
}

impl OutgoingPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, operation: &str, mode: OperationMode) -> OutgoingGuard<'_> {
        let mut slot = self.free.lock().pop().unwrap_or_default();
        slot.operation.clear();
        slot.operation.push_str(operation);
        slot.mode = mode;
        slot.os.reset();
        *self.in_use.lock() += 1;
        OutgoingGuard { pool: self, slot }
    }

    pub fn in_use(&self) -> usize {
        *self.in_use.lock()
    }

    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    fn reclaim(&self, slot: Outgoing) {
        self.free.lock().push(slot);
        let mut in_use = self.in_use.lock();
        *in_use = in_use.saturating_sub(1);
    }
}

pub struct OutgoingGuard<'a> {
    pool: &'a OutgoingPool,
    slot: Outgoing,
}

impl Deref for OutgoingGuard<'_> {
    type Target = Outgoing;

    fn deref(&self) -> &Outgoing {
        &self.slot
    }
}

impl DerefMut for OutgoingGuard<'_> {
    fn deref_mut(&mut self) -> &mut Outgoing {
        &mut self.slot
    }
}

impl Drop for OutgoingGuard<'_> {
    fn drop(&mut self) {
        let slot = std::mem::take(&mut self.slot);
        self.pool.reclaim(slot);
    }
}
