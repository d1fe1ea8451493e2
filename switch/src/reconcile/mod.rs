//! SIM status reconciliation module

pub mod reconciler;
