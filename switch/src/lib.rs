//! simswitch Library
//!
//! Core modules for fleet SIM diagnostics and status reconciliation.

pub mod app;
pub mod cache;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod diag;
pub mod errors;
pub mod export;
pub mod logs;
pub mod models;
pub mod provider;
pub mod reconcile;
pub mod report;
pub mod server;
pub mod setup;
pub mod utils;
