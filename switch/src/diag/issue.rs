//! Issue records produced by the diagnostic rule chain

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a problem found on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    /// Device has not checked in for longer than the stale threshold
    Stale,

    /// Device model does not appear in the model catalog
    UnsupportedModel,

    /// Device OS version is below the catalog floor for its model
    OutOfDateOperatingSystem,

    /// Device is missing supervision or management enrollment
    NotEnrolled,

    /// Device display name does not equal its serial
    Name,

    /// ICCID prefix does not match any cataloged carrier
    UnknownCarrier,

    /// ICCID belongs to a carrier not approved for fleet use
    UnapprovedCarrier,

    /// Device tags lack the carrier's configuration profile
    MissingCarrierProfile,

    /// No SIM with the device's ICCID exists at the provider
    IccidNotFound,

    /// Provider SIM label does not equal the device serial
    SimBadLabel,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueKind::Stale => "Stale",
            IssueKind::UnsupportedModel => "UnsupportedModel",
            IssueKind::OutOfDateOperatingSystem => "OutOfDateOperatingSystem",
            IssueKind::NotEnrolled => "NotEnrolled",
            IssueKind::Name => "Name",
            IssueKind::UnknownCarrier => "UnknownCarrier",
            IssueKind::UnapprovedCarrier => "UnapprovedCarrier",
            IssueKind::MissingCarrierProfile => "MissingCarrierProfile",
            IssueKind::IccidNotFound => "IccidNotFound",
            IssueKind::SimBadLabel => "SimBadLabel",
        };
        f.write_str(name)
    }
}

/// A single finding against a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Serial of the device the finding is about
    pub serial: String,

    /// What kind of problem was found
    pub kind: IssueKind,

    /// Human-readable detail, when the rule has one
    pub note: Option<String>,
}
