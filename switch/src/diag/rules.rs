//! The ordered diagnostic rule chain
//!
//! Rules run in a fixed order and each one decides whether evaluation of the
//! device continues past it. Early rules can therefore suppress everything
//! downstream, e.g. a device with no SIM is never checked against the
//! carrier catalog or the provider directory.

use chrono::Duration;

use crate::catalog::{match_carrier, match_model};
use crate::diag::engine::{DiagError, RuleCtx};
use crate::diag::issue::{Issue, IssueKind};
use crate::models::os_version::OsVersion;

/// Days without a check-in before a device counts as stale
const STALE_AFTER_DAYS: i64 = 365;

/// One rule's verdict for a device
pub(crate) struct StepResult {
    /// Finding to record, if the rule flagged one
    pub issue: Option<Issue>,

    /// False when evaluation must not continue past this rule
    pub cont: bool,
}

impl StepResult {
    fn pass() -> Self {
        Self {
            issue: None,
            cont: true,
        }
    }

    fn stop() -> Self {
        Self {
            issue: None,
            cont: false,
        }
    }

    fn emit(issue: Issue) -> Self {
        Self {
            issue: Some(issue),
            cont: true,
        }
    }

    fn emit_and_stop(issue: Issue) -> Self {
        Self {
            issue: Some(issue),
            cont: false,
        }
    }
}

pub(crate) type Rule = fn(&mut RuleCtx) -> Result<StepResult, DiagError>;

/// Every rule in evaluation order
pub(crate) const RULE_CHAIN: &[(&str, Rule)] = &[
    ("staleness", staleness),
    ("model", model),
    ("enrollment", enrollment),
    ("naming", naming),
    ("no-sim", no_sim),
    ("carrier", carrier),
    ("profile-tag", profile_tag),
    ("sim-presence", sim_presence),
    ("sim-label", sim_label),
];

/// A device that has not checked in for over a year is reported as stale
/// and nothing else is checked
fn staleness(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    let elapsed = ctx.now.signed_duration_since(ctx.device.last_seen);
    if elapsed > Duration::days(STALE_AFTER_DAYS) {
        let note = format!("Hasn't been online for {} days.", elapsed.num_days());
        return Ok(StepResult::emit_and_stop(
            ctx.issue(IssueKind::Stale, Some(note)),
        ));
    }
    Ok(StepResult::pass())
}

/// Check the model against the catalog and, when it is known, compare the
/// device OS version against the catalog floor
fn model(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    let Some(policy) = match_model(&ctx.device.model, ctx.models) else {
        let note = format!("Model '{}'", ctx.device.model);
        return Ok(StepResult::emit(
            ctx.issue(IssueKind::UnsupportedModel, Some(note)),
        ));
    };

    let current: OsVersion = ctx.device.os_version.parse().map_err(|source| {
        DiagError::OsVersion {
            value: ctx.device.os_version.clone(),
            source,
        }
    })?;
    let minimum: OsVersion = policy.min_os_version.parse().map_err(|source| {
        DiagError::OsVersion {
            value: policy.min_os_version.clone(),
            source,
        }
    })?;

    if current < minimum {
        let note = format!(
            "Current version {} < {} expected for {}.",
            ctx.device.os_version, policy.min_os_version, policy.name
        );
        return Ok(StepResult::emit(
            ctx.issue(IssueKind::OutOfDateOperatingSystem, Some(note)),
        ));
    }

    Ok(StepResult::pass())
}

/// Devices must be both supervised and managed
fn enrollment(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    if !ctx.device.supervised || !ctx.device.managed {
        let note = format!(
            "Supervised {}, managed {}",
            ctx.device.supervised, ctx.device.managed
        );
        return Ok(StepResult::emit(
            ctx.issue(IssueKind::NotEnrolled, Some(note)),
        ));
    }
    Ok(StepResult::pass())
}

/// The console display name must equal the device serial
fn naming(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    if ctx.device.name != ctx.device.serial {
        let note = format!("Named '{}'.", ctx.device.name);
        return Ok(StepResult::emit(ctx.issue(IssueKind::Name, Some(note))));
    }
    Ok(StepResult::pass())
}

/// Devices without a SIM are done at this point, with no finding
fn no_sim(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    if !ctx.device.has_sim() {
        return Ok(StepResult::stop());
    }
    Ok(StepResult::pass())
}

/// The ICCID must map to an approved carrier; either failure ends evaluation
fn carrier(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    match match_carrier(&ctx.device.iccid, ctx.carriers) {
        None => {
            let note = format!("ICCID '{}'", ctx.device.iccid);
            Ok(StepResult::emit_and_stop(
                ctx.issue(IssueKind::UnknownCarrier, Some(note)),
            ))
        }
        Some(policy) if !policy.approved => {
            let note = format!("Unapproved carrier '{}'.", policy.name);
            Ok(StepResult::emit_and_stop(
                ctx.issue(IssueKind::UnapprovedCarrier, Some(note)),
            ))
        }
        Some(policy) => {
            ctx.carrier = Some(policy);
            Ok(StepResult::pass())
        }
    }
}

/// The device must carry the matched carrier's configuration profile tag
fn profile_tag(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    // Only reached once the carrier rule has stashed an approved match
    let Some(carrier) = ctx.carrier else {
        return Ok(StepResult::pass());
    };

    if !ctx.device.tags.contains(&carrier.configuration_profile) {
        let note = format!(
            "Tags '{}' does not contain '{}'.",
            ctx.device.tags_joined(),
            carrier.configuration_profile
        );
        return Ok(StepResult::emit(
            ctx.issue(IssueKind::MissingCarrierProfile, Some(note)),
        ));
    }

    Ok(StepResult::pass())
}

/// The ICCID must exist in the provider's SIM directory
fn sim_presence(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    match ctx.sims.iter().find(|sim| sim.iccid == ctx.device.iccid) {
        None => Ok(StepResult::emit_and_stop(
            ctx.issue(IssueKind::IccidNotFound, None),
        )),
        Some(sim) => {
            ctx.sim = Some(sim);
            Ok(StepResult::pass())
        }
    }
}

/// The provider-side SIM label must equal the device serial
fn sim_label(ctx: &mut RuleCtx) -> Result<StepResult, DiagError> {
    let Some(sim) = ctx.sim else {
        return Ok(StepResult::pass());
    };

    if sim.unique_name.as_deref() != Some(ctx.device.serial.as_str()) {
        let note = format!(
            "Currently named '{}' instead of device serial.",
            sim.unique_name.as_deref().unwrap_or("")
        );
        return Ok(StepResult::emit(
            ctx.issue(IssueKind::SimBadLabel, Some(note)),
        ));
    }

    Ok(StepResult::pass())
}
