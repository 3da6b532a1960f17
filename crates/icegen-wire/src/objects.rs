//! Object graph marshaling.
//!
//! References are written as negative instance indices (0 is null); the
//! instances themselves follow later in batches, each as its slices
//! (most-derived first, ending with the `::Ice::Object` root slice).

use std::collections::{BTreeMap, HashMap};

use crate::dispatch::ROOT_TYPE_ID;
use crate::{DecodeError, InputStream, OutputStream, PatchTable};

/// A class instance as seen by the marshaling runtime.
pub trait Instance: Clone {
    /// Most-derived type id.
    fn ice_id(&self) -> &'static str;

    fn ice_is_a(&self, id: &str) -> bool;

    /// Stable identity used to share one wire index between aliases.
    fn identity(&self) -> usize;

    /// Write every slice of this instance, most-derived first.
    fn write(&self, out: &mut OutputStream, objects: &mut ObjectWriter<Self>);
}

pub struct ObjectWriter<T> {
    indices: HashMap<usize, i32>,
    pending: Vec<(i32, T)>,
}

impl<T> Default for ObjectWriter<T> {
    fn default() -> Self {
        Self {
            indices: HashMap::new(),
            pending: Vec::new(),
        }
    }
}

impl<T: Instance> ObjectWriter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a reference and queue the instance the first time it is seen.
    pub fn write_object(&mut self, out: &mut OutputStream, value: Option<&T>) {
        let Some(value) = value else {
            out.write_int(0);
            return;
        };
        let next = self.indices.len() as i32 + 1;
        let index = *self.indices.entry(value.identity()).or_insert_with(|| {
            self.pending.push((next, value.clone()));
            next
        });
        out.write_int(-index);
    }

    /// Write queued instances until none remain, then a zero-size terminator.
    pub fn write_pending_objects(&mut self, out: &mut OutputStream) {
        while !self.pending.is_empty() {
            let batch = std::mem::take(&mut self.pending);
            out.write_size(batch.len());
            for (index, instance) in batch {
                out.write_int(index);
                instance.write(out, self);
            }
        }
        out.write_size(0);
    }

    /// The terminating `::Ice::Object` slice every instance ends with.
    pub fn write_root_slice(out: &mut OutputStream) {
        out.write_type_id(ROOT_TYPE_ID);
        out.start_write_slice();
        out.end_write_slice();
    }
}

pub struct ObjectReader<T> {
    patches: PatchTable<T>,
    instances: BTreeMap<i32, T>,
}

impl<T> Default for ObjectReader<T> {
    fn default() -> Self {
        Self {
            patches: PatchTable::default(),
            instances: BTreeMap::new(),
        }
    }
}

impl<T: Instance> ObjectReader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_patches(&self) -> usize {
        self.patches.len()
    }

    /// Read a reference and register `assign` to receive the instance once
    /// it has been fully reconstructed.
    pub fn read_object(
        &mut self,
        input: &mut InputStream<'_>,
        expected: &str,
        assign: impl FnOnce(Option<T>) + 'static,
    ) -> Result<(), DecodeError> {
        let raw = input.read_int()?;
        let index = raw
            .checked_neg()
            .filter(|&index| index >= 0)
            .ok_or(DecodeError::IllegalObjectReference(raw))?;
        self.patches.register(index, expected, assign);
        Ok(())
    }

    /// Reconstruct every instance that follows and resolve pending patches.
    ///
    /// `factory` is called with each slice type id in turn. It returns
    /// `Some` after reading that slice and the remaining base slices, or
    /// `None` to have an unknown slice skipped.
    ///
    /// Instances never outlive the pass. On error every registration is
    /// abandoned, so a later pass on the same reader starts clean.
    pub fn read_pending_objects<F>(
        &mut self,
        input: &mut InputStream<'_>,
        mut factory: F,
    ) -> Result<usize, DecodeError>
    where
        F: FnMut(&str, &mut InputStream<'_>, &mut ObjectReader<T>) -> Result<Option<T>, DecodeError>,
    {
        self.instances.clear();
        let result = match self.read_batches(input, &mut factory) {
            Ok(()) => self.patches.resolve(&self.instances),
            Err(err) => Err(err),
        };
        if result.is_err() {
            let dropped = self.patches.abandon();
            tracing::debug!(dropped, "decode failed, patches abandoned");
        }
        self.instances.clear();
        result
    }

    fn read_batches<F>(&mut self, input: &mut InputStream<'_>, factory: &mut F) -> Result<(), DecodeError>
    where
        F: FnMut(&str, &mut InputStream<'_>, &mut ObjectReader<T>) -> Result<Option<T>, DecodeError>,
    {
        loop {
            let batch = input.read_size()?;
            if batch == 0 {
                return Ok(());
            }
            for _ in 0..batch {
                let index = input.read_int()?;
                if index <= 0 {
                    return Err(DecodeError::IllegalObjectReference(index));
                }
                let instance = self.read_instance(input, factory)?;
                self.instances.insert(index, instance);
            }
        }
    }

    fn read_instance<F>(&mut self, input: &mut InputStream<'_>, factory: &mut F) -> Result<T, DecodeError>
    where
        F: FnMut(&str, &mut InputStream<'_>, &mut ObjectReader<T>) -> Result<Option<T>, DecodeError>,
    {
        let mut most_derived = None;
        loop {
            let id = input.read_type_id()?;
            let first = most_derived.get_or_insert_with(|| id.clone());
            if id == ROOT_TYPE_ID {
                return Err(DecodeError::NoObjectFactory(first.clone()));
            }
            if let Some(instance) = factory(&id, input, self)? {
                return Ok(instance);
            }
            tracing::trace!(type_id = %id, "skipping unknown slice");
            input.skip_slice()?;
        }
    }

    /// Discard registrations after a failed decode.
    pub fn abandon(&mut self) -> usize {
        self.patches.abandon()
    }
}

impl InputStream<'_> {
    /// Read the terminating `::Ice::Object` slice.
    pub fn read_root_slice(&mut self) -> Result<(), DecodeError> {
        let id = self.read_type_id()?;
        if id != ROOT_TYPE_ID {
            return Err(DecodeError::UnexpectedObjectType {
                expected: ROOT_TYPE_ID.to_owned(),
                actual: id,
            });
        }
        self.skip_slice()
    }
}
