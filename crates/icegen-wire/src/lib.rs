#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Wire format and runtime support for code generated by icegen.
//!
//! This crate contains:
//! - Byte streams with slices, encapsulations and type-id compression (`stream`)
//! - The enum width rule shared by the generator and the runtime (`enum_width`)
//! - Object graph marshaling with deferred patching (`objects`, `patch`)
//! - Dispatch lookup tables and the dispatch entry point (`dispatch`)
//! - Invocation error taxonomy, request slots and async completion guards

pub mod completion;
pub mod dispatch;
pub mod enum_width;
mod error;
pub mod exceptions;
pub mod invocation;
pub mod objects;
pub mod outgoing;
pub mod patch;
pub mod stream;

pub use completion::Completion;
pub use dispatch::{
    BUILTIN_OPERATIONS, Dispatch, DispatchStatus, OperationTable, ROOT_TYPE_ID, TypeIdTable,
    dispatch,
};
pub use enum_width::EnumWidth;
pub use error::DecodeError;
pub use exceptions::{UserException, read_user_exception, write_user_exception};
pub use invocation::{InvocationError, NonRepeatable, TransportError, invoke_with_retry};
pub use objects::{Instance, ObjectReader, ObjectWriter};
pub use outgoing::{Outgoing, OutgoingGuard, OutgoingPool};
pub use patch::{PatchHandle, PatchTable};
pub use stream::{ENCODING_MAJOR, ENCODING_MINOR, Identity, InputStream, OutputStream};

#[cfg(test)]
mod enum_width_tests;
#[cfg(test)]
mod objects_tests;
#[cfg(test)]
mod stream_tests;
