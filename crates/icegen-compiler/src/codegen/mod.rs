//! Target language emitters.

pub mod java;
