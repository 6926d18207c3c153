//! Data types for parsed task documents.

mod common;
mod task;

pub use common::*;
pub use task::*;
