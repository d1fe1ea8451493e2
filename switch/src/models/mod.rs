//! Data model module

pub mod device;
pub mod os_version;
pub mod policy;
pub mod sim;
