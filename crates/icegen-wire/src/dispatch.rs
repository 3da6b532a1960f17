//! Server-side dispatch tables.
//!
//! Both tables are sorted and deduplicated when built and only read
//! afterwards, so lookups need no synchronization.

use crate::{DecodeError, InputStream, OutputStream};

/// Type id every class and interface implicitly derives from.
pub const ROOT_TYPE_ID: &str = "::Ice::Object";

/// Operations every servant answers, in sorted order.
pub const BUILTIN_OPERATIONS: [&str; 4] = ["ice_id", "ice_ids", "ice_isA", "ice_ping"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchStatus {
    Ok,
    UserException,
    OperationNotExist,
    /// The servant will complete the request later.
    Async,
}

/// Sorted operation names, including the built-ins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationTable {
    names: Vec<String>,
}

impl OperationTable {
    pub fn new<I, S>(operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = operations
            .into_iter()
            .map(Into::into)
            .chain(BUILTIN_OPERATIONS.iter().map(|s| s.to_string()))
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Binary search for an operation; `None` is a dispatch miss.
    pub fn position(&self, operation: &str) -> Option<usize> {
        self.names
            .binary_search_by(|n| n.as_str().cmp(operation))
            .ok()
    }

    pub fn name(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Sorted type ids of a type, its ancestors and the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeIdTable {
    ids: Vec<String>,
    own: usize,
}

impl TypeIdTable {
    pub fn new<I, S>(own: &str, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ancestors
            .into_iter()
            .map(Into::into)
            .chain([own.to_owned(), ROOT_TYPE_ID.to_owned()])
            .collect();
        ids.sort();
        ids.dedup();
        let own = ids.binary_search_by(|id| id.as_str().cmp(own)).unwrap_or(0);
        Self { ids, own }
    }

    pub fn is_a(&self, id: &str) -> bool {
        self.ids.binary_search_by(|x| x.as_str().cmp(id)).is_ok()
    }

    pub fn ice_id(&self) -> &str {
        &self.ids[self.own]
    }

    pub fn ice_ids(&self) -> &[String] {
        &self.ids
    }

    /// Position of the type's own id in [`ice_ids`](Self::ice_ids).
    pub fn own_position(&self) -> usize {
        self.own
    }
}

/// A servant that routes operations through its tables.
pub trait Dispatch {
    fn operations(&self) -> &OperationTable;

    fn type_ids(&self) -> &TypeIdTable;

    /// Handle a non-built-in operation found at `position`.
    fn dispatch_position(
        &self,
        position: usize,
        input: &mut InputStream<'_>,
        out: &mut OutputStream,
    ) -> Result<DispatchStatus, DecodeError>;
}

/// Route one request: built-ins are answered here, everything else goes to
/// [`Dispatch::dispatch_position`].
pub fn dispatch<D: Dispatch + ?Sized>(
    servant: &D,
    operation: &str,
    input: &mut InputStream<'_>,
    out: &mut OutputStream,
) -> Result<DispatchStatus, DecodeError> {
    let Some(position) = servant.operations().position(operation) else {
        tracing::debug!(operation, "operation not found");
        return Ok(DispatchStatus::OperationNotExist);
    };
    match operation {
        "ice_id" => out.write_string(servant.type_ids().ice_id()),
        "ice_ids" => out.write_string_seq(servant.type_ids().ice_ids()),
        "ice_isA" => {
            let id = input.read_string()?;
            out.write_bool(servant.type_ids().is_a(&id));
        }
        "ice_ping" => {}
        _ => return servant.dispatch_position(position, input, out),
    }
    Ok(DispatchStatus::Ok)
}
