//! Device fleet records

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ICCID placeholder reported for devices with no SIM fitted
pub const NO_SIM: &str = "no-SIM";

/// A managed device as it appears in the fleet export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Hardware serial number, unique across the fleet
    pub serial: String,

    /// Display name assigned in the management console
    pub name: String,

    /// Hardware model string, e.g. `Tablet-5 X`
    pub model: String,

    /// Operating system version, dotted numeric
    pub os_version: String,

    /// ICCID of the fitted SIM, or the no-SIM placeholder
    pub iccid: String,

    /// True when the device is supervised
    pub supervised: bool,

    /// True when the device is enrolled in management
    pub managed: bool,

    /// Configuration tags applied to the device
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Last time the device checked in
    pub last_seen: DateTime<Utc>,
}

impl Device {
    /// True when the device reports a real ICCID rather than the placeholder
    pub fn has_sim(&self) -> bool {
        !self.iccid.is_empty() && self.iccid != NO_SIM
    }

    /// Tags joined for display, in sorted order
    pub fn tags_joined(&self) -> String {
        self.tags.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
