//! Deferred assignment of decoded object references.
//!
//! An object reference can be read before the instance it points to (a
//! forward reference or a cycle). The reader registers a pending patch for
//! each reference and resolves the whole table once every instance of the
//! encapsulation has been reconstructed.

use std::collections::BTreeMap;
use std::fmt;

use crate::dispatch::ROOT_TYPE_ID;
use crate::{DecodeError, Instance};

/// Registration handle, ordered by registration time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PatchHandle(u32);

pub(crate) struct PendingPatch<T> {
    /// Wire index of the referent; 0 is a null reference.
    index: i32,
    /// Type id the slot requires, chosen at registration.
    expected: String,
    assign: Box<dyn FnOnce(Option<T>)>,
}

pub struct PatchTable<T> {
    next: u32,
    pending: BTreeMap<PatchHandle, PendingPatch<T>>,
}

impl<T> Default for PatchTable<T> {
    fn default() -> Self {
        Self {
            next: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<T> fmt::Debug for PatchTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.pending
                    .iter()
                    .map(|(h, p)| (h, (p.index, p.expected.as_str()))),
            )
            .finish()
    }
}

impl<T: Instance> PatchTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Register a slot to be filled with instance `index`.
    pub fn register(
        &mut self,
        index: i32,
        expected: impl Into<String>,
        assign: impl FnOnce(Option<T>) + 'static,
    ) -> PatchHandle {
        let handle = PatchHandle(self.next);
        self.next += 1;
        self.pending.insert(
            handle,
            PendingPatch {
                index,
                expected: expected.into(),
                assign: Box::new(assign),
            },
        );
        handle
    }

    /// Apply every pending patch, in registration order.
    ///
    /// All patches are validated first; on error nothing is applied and the
    /// table keeps its entries.
    pub fn resolve(&mut self, instances: &BTreeMap<i32, T>) -> Result<usize, DecodeError> {
        for patch in self.pending.values() {
            if patch.index == 0 {
                continue;
            }
            let instance = instances
                .get(&patch.index)
                .ok_or(DecodeError::UnresolvedInstance(patch.index))?;
            if patch.expected != ROOT_TYPE_ID && !instance.ice_is_a(&patch.expected) {
                return Err(DecodeError::UnexpectedObjectType {
                    expected: patch.expected.clone(),
                    actual: instance.ice_id().to_owned(),
                });
            }
        }

        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for (_, patch) in pending {
            let value = match patch.index {
                0 => None,
                index => instances.get(&index).cloned(),
            };
            (patch.assign)(value);
        }
        tracing::trace!(count, "patches resolved");
        Ok(count)
    }

    /// Drop every pending patch without applying it.
    pub fn abandon(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}
