#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! icegen compiler: the code generation backend for Slice.
//!
//! The backend consumes a resolved [`Unit`](icegen_core::Unit) read-only:
//! - `analyze` - derived plans (exception ordering, dispatch tables, patch slots)
//! - `codegen` - target emitters; Java is the only target
//! - `driver` - runs every artifact kind over every definition

pub mod analyze;
pub mod codegen;
mod driver;
mod model;

pub use codegen::java::{ArtifactKind, Config};
pub use driver::{Artifact, artifact_kinds, generate};

use icegen_core::{DefId, ModelError};

/// Internal consistency failures. Each one aborts generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("reference to undefined definition #{}", .0.0)]
    Dangling(DefId),

    #[error("`{name}` is a {found}, expected {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A local type reached a marshaling path.
    #[error("`{0}` is local and cannot be marshaled")]
    LocalOnWire(String),

    #[error("constant `{name}` has invalid value `{value}`")]
    InvalidConstant { name: String, value: String },

    #[error("exception hierarchy of `{0}` is cyclic")]
    CyclicExceptions(String),

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test_utils;
