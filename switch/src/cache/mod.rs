//! Caching module

pub mod directory;
