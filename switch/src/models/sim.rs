//! SIM records and status values as reported by the provider

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a SIM at the provider
///
/// Parsing never fails: a status the service does not recognize is carried
/// through verbatim as [`SimStatus::Other`]. Equality ignores case, so a
/// provider reporting `Active` matches a request asking for `active`.
#[derive(Debug, Clone, Eq)]
pub enum SimStatus {
    Ready,
    Active,
    Inactive,
    Other(String),
}

impl SimStatus {
    /// Parse a provider status string
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ready" => SimStatus::Ready,
            "active" => SimStatus::Active,
            "inactive" => SimStatus::Inactive,
            _ => SimStatus::Other(value.trim().to_string()),
        }
    }

    /// Canonical lowercase form used on the wire
    pub fn as_str(&self) -> &str {
        match self {
            SimStatus::Ready => "ready",
            SimStatus::Active => "active",
            SimStatus::Inactive => "inactive",
            SimStatus::Other(value) => value,
        }
    }
}

impl PartialEq for SimStatus {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SimStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SimStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SimStatus::parse(&s))
    }
}

/// A SIM as returned by the provider API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimRecord {
    /// Provider-assigned SIM identifier
    pub sid: String,

    /// ICCID printed on the SIM
    pub iccid: String,

    /// Display name, normally the serial of the device the SIM sits in
    pub unique_name: Option<String>,

    /// Current lifecycle status
    pub status: SimStatus,
}
