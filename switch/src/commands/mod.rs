//! CLI command implementations

pub mod diag;
pub mod setup;
