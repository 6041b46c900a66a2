//! Dataset assembly and output.
//!
//! This module handles:
//! - The ResultRow output schema and its invariants
//! - The shared run context and the truncating CSV flush

pub mod row;
pub mod writer;

pub use row::{result_binary, ResultRow};
pub use writer::RunContext;
