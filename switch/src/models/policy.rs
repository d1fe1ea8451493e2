//! Catalog policy records for models and carriers

use serde::{Deserialize, Serialize};

/// A supported hardware model and the OS floor expected on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPolicy {
    /// Model name, matched as a prefix against device model strings
    pub name: String,

    /// Minimum acceptable OS version for this model
    pub min_os_version: String,
}

/// A known cellular carrier and its fleet approval status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierPolicy {
    /// Carrier display name
    pub name: String,

    /// ICCID prefix issued by this carrier
    pub iccid_prefix: String,

    /// True when SIMs from this carrier may be used in the fleet
    pub approved: bool,

    /// Configuration profile tag devices on this carrier must carry
    pub configuration_profile: String,
}
