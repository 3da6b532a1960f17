#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Type model for the icegen Slice code generator.
//!
//! The model is the read-only contract between a Slice front end and the
//! generator backends:
//! - **Definitions** (`defs`): classes, interfaces, exceptions, structs, enums,
//!   sequences, dictionaries and constants, addressed by `DefId`
//! - **Types** (`types`): the closed set of type references used by members,
//!   parameters and return values
//! - **Unit** (`unit`): the definition table plus derived facts (flattened
//!   bases and operations, class usage, patcher member lists)
//!
//! A unit is usually loaded from JSON and checked with [`Unit::check`] before
//! any backend touches it.

pub mod defs;
pub mod interner;
pub mod types;
pub mod unit;
pub mod utils;
mod validate;

pub use defs::{
    ClassDef, ConstDef, DataMember, DefKind, Definition, DictionaryDef, EnumDef, ExceptionDef,
    Operation, OperationMode, Param, SequenceDef, StructDef,
};
pub use interner::{Interner, Symbol};
pub use types::{BuiltinKind, DefId, Type};
pub use unit::{OpRef, Unit};
pub use validate::ModelError;

#[cfg(test)]
mod utils_tests;
