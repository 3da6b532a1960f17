//! User exceptions on the wire.
//!
//! An exception is written as a "uses classes" flag followed by its slices,
//! most-derived first. Each slice is its type id as a plain string and a
//! length-prefixed body. When the flag is set, the slices are enclosed in
//! one outer slice and the pending objects follow it, so a reader that
//! recognises none of the slices still knows where they end.

use crate::{DecodeError, InputStream, Instance, InvocationError, ObjectReader, ObjectWriter, OutputStream};

pub trait UserException {
    /// Class instances the exception's members may refer to.
    type Object: Instance;

    /// Scoped id of the most-derived exception type.
    fn ice_name(&self) -> &'static str;

    /// Whether any member transitively holds a class instance.
    fn uses_classes(&self) -> bool {
        false
    }

    /// Write every slice, most-derived first.
    fn write(&self, out: &mut OutputStream, objects: &mut ObjectWriter<Self::Object>);
}

pub fn write_user_exception<E: UserException + ?Sized>(out: &mut OutputStream, ex: &E) {
    let uses_classes = ex.uses_classes();
    out.write_bool(uses_classes);
    let mut objects = ObjectWriter::new();
    if !uses_classes {
        ex.write(out, &mut objects);
        return;
    }
    out.start_write_slice();
    ex.write(out, &mut objects);
    out.end_write_slice();
    objects.write_pending_objects(out);
}

/// Decode a user exception reply.
///
/// `factory` sees each slice id in turn and either reads the rest of the
/// exception or returns `None` to skip the slice. Class members it reads
/// through `objects` are patched from the pending objects that follow,
/// reconstructed by `object_factory`. When no slice is recognised the
/// most-derived id is reported as an unknown user exception.
pub fn read_user_exception<E, T, F, G>(
    input: &mut InputStream<'_>,
    objects: &mut ObjectReader<T>,
    mut factory: F,
    object_factory: G,
) -> InvocationError<E>
where
    T: Instance,
    F: FnMut(&str, &mut InputStream<'_>, &mut ObjectReader<T>) -> Result<Option<E>, DecodeError>,
    G: FnMut(&str, &mut InputStream<'_>, &mut ObjectReader<T>) -> Result<Option<T>, DecodeError>,
{
    match read_slices(input, objects, &mut factory, object_factory) {
        Ok(Ok(ex)) => InvocationError::User(ex),
        Ok(Err(type_id)) => InvocationError::UnknownUser { type_id },
        Err(err) => {
            objects.abandon();
            InvocationError::Decode(err)
        }
    }
}

fn read_slices<E, T, F, G>(
    input: &mut InputStream<'_>,
    objects: &mut ObjectReader<T>,
    factory: &mut F,
    object_factory: G,
) -> Result<Result<E, String>, DecodeError>
where
    T: Instance,
    F: FnMut(&str, &mut InputStream<'_>, &mut ObjectReader<T>) -> Result<Option<E>, DecodeError>,
    G: FnMut(&str, &mut InputStream<'_>, &mut ObjectReader<T>) -> Result<Option<T>, DecodeError>,
{
    let uses_classes = input.read_bool()?;
    let end = if uses_classes {
        input.start_read_slice()?;
        input.slice_end()
    } else {
        None
    };
    let at_end = |input: &InputStream<'_>| match end {
        Some(end) => input.pos() >= end,
        None => input.is_empty(),
    };

    let mut most_derived: Option<String> = None;
    while !at_end(&*input) {
        let id = input.read_string()?;
        most_derived.get_or_insert_with(|| id.clone());
        if let Some(ex) = factory(&id, input, objects)? {
            if uses_classes {
                input.end_read_slice()?;
                objects.read_pending_objects(input, object_factory)?;
            }
            return Ok(Ok(ex));
        }
        input.skip_slice()?;
    }
    if uses_classes {
        input.end_read_slice()?;
    }
    Ok(Err(most_derived.unwrap_or_default()))
}
