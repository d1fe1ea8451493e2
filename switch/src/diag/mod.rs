//! Device diagnostics module

pub mod engine;
pub mod issue;
pub mod runner;

mod rules;
