//! Plans derived from the unit before any text is emitted.
//!
//! Every plan is rebuilt per emission pass; ordering comes from sorting, never
//! from incidental declaration order.

pub mod dispatch_plan;
pub mod exception_order;
pub mod patch_plan;

pub use dispatch_plan::{DispatchEntry, DispatchPlan, DispatchTarget};
pub use exception_order::{derived_first, wire_throws};
pub use patch_plan::{PatchPlan, PatchSlot};

#[cfg(test)]
mod patch_plan_tests;
