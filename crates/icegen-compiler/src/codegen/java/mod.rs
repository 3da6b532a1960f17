//! Java emitter.
//!
//! Each artifact is one Java compilation unit produced by an [`Emitter`]
//! bound to a single definition. The emitter's methods are split by concern:
//! type mapping, marshal code, patchers, dispatch, invocation paths and the
//! per-artifact templates.

mod async_paths;
mod bindings;
mod config;
mod dispatch;
mod emitter;
mod helpers;
mod holders;
mod literal;
mod marshal;
mod naming;
mod operations;
mod output;
mod patcher;
mod proxies;
mod signature;
mod type_mapper;

pub use config::Config;
pub use emitter::{ArtifactKind, Emitter};
pub use literal::string_literal;
pub use marshal::{IterCounter, is_local_type};
pub use output::Output;
pub use type_mapper::TypeMode;

#[cfg(test)]
mod async_paths_tests;
#[cfg(test)]
mod dispatch_tests;
#[cfg(test)]
mod operations_tests;
#[cfg(test)]
mod patcher_tests;
