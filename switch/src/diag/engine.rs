//! Rule chain driver for single-device evaluation

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::diag::issue::{Issue, IssueKind};
use crate::diag::rules::RULE_CHAIN;
use crate::models::device::Device;
use crate::models::os_version::VersionError;
use crate::models::policy::{CarrierPolicy, ModelPolicy};
use crate::models::sim::SimRecord;

/// Error that fails evaluation of a single device
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagError {
    #[error("invalid OS version '{value}': {source}")]
    OsVersion {
        value: String,
        #[source]
        source: VersionError,
    },
}

/// Evaluation state threaded through the rule chain for one device
pub(crate) struct RuleCtx<'a> {
    pub device: &'a Device,
    pub models: &'a [ModelPolicy],
    pub carriers: &'a [CarrierPolicy],
    pub sims: &'a [SimRecord],
    pub now: DateTime<Utc>,

    /// Approved carrier stashed by the carrier rule for later rules
    pub carrier: Option<&'a CarrierPolicy>,

    /// Provider SIM record stashed by the presence rule for later rules
    pub sim: Option<&'a SimRecord>,
}

impl RuleCtx<'_> {
    pub(crate) fn issue(&self, kind: IssueKind, note: Option<String>) -> Issue {
        Issue {
            serial: self.device.serial.clone(),
            kind,
            note,
        }
    }
}

/// Run the full rule chain against one device
///
/// Issues come back in rule order. An `Err` means this device could not be
/// evaluated at all and says nothing about the rest of the fleet.
pub fn evaluate_device(
    device: &Device,
    models: &[ModelPolicy],
    carriers: &[CarrierPolicy],
    sims: &[SimRecord],
    now: DateTime<Utc>,
) -> Result<Vec<Issue>, DiagError> {
    let mut ctx = RuleCtx {
        device,
        models,
        carriers,
        sims,
        now,
        carrier: None,
        sim: None,
    };

    let mut issues = Vec::new();
    for (name, rule) in RULE_CHAIN {
        let step = rule(&mut ctx)?;
        if let Some(issue) = step.issue {
            debug!("Rule '{}' flagged {}: {}", name, device.serial, issue.kind);
            issues.push(issue);
        }
        if !step.cont {
            break;
        }
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::BTreeSet;

    use crate::models::device::NO_SIM;
    use crate::models::sim::SimStatus;

    fn healthy_device() -> Device {
        let mut tags = BTreeSet::new();
        tags.insert("alpha-profile".to_string());
        Device {
            serial: "C02XL0GT".to_string(),
            name: "C02XL0GT".to_string(),
            model: "Tablet-5".to_string(),
            os_version: "2.0".to_string(),
            iccid: "8988307000000000001".to_string(),
            supervised: true,
            managed: true,
            tags,
            last_seen: Utc::now(),
        }
    }

    fn models() -> Vec<ModelPolicy> {
        vec![ModelPolicy {
            name: "Tablet-5".to_string(),
            min_os_version: "1.0".to_string(),
        }]
    }

    fn carriers() -> Vec<CarrierPolicy> {
        vec![CarrierPolicy {
            name: "Alpha Mobile".to_string(),
            iccid_prefix: "8988307".to_string(),
            approved: true,
            configuration_profile: "alpha-profile".to_string(),
        }]
    }

    fn sims() -> Vec<SimRecord> {
        vec![SimRecord {
            sid: "SIM001".to_string(),
            iccid: "8988307000000000001".to_string(),
            unique_name: Some("C02XL0GT".to_string()),
            status: SimStatus::Active,
        }]
    }

    fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_healthy_device_has_no_issues() {
        let device = healthy_device();
        let issues =
            evaluate_device(&device, &models(), &carriers(), &sims(), Utc::now()).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_stale_device_reports_nothing_else() {
        let mut device = healthy_device();
        device.last_seen = Utc::now() - Duration::days(400);
        device.name = "Break room tablet".to_string();
        device.supervised = false;

        let issues =
            evaluate_device(&device, &models(), &carriers(), &sims(), Utc::now()).unwrap();
        assert_eq!(kinds(&issues), vec![IssueKind::Stale]);
        assert_eq!(
            issues[0].note.as_deref(),
            Some("Hasn't been online for 400 days.")
        );
    }

    #[test]
    fn test_device_one_year_old_is_not_stale() {
        let mut device = healthy_device();
        let now = Utc::now();
        device.last_seen = now - Duration::days(365);

        let issues = evaluate_device(&device, &models(), &carriers(), &sims(), now).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unsupported_model_still_checks_later_rules() {
        let mut device = healthy_device();
        device.model = "Phone-9".to_string();
        device.managed = false;

        let issues =
            evaluate_device(&device, &models(), &carriers(), &sims(), Utc::now()).unwrap();
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::UnsupportedModel, IssueKind::NotEnrolled]
        );
        assert_eq!(issues[0].note.as_deref(), Some("Model 'Phone-9'"));
        assert_eq!(
            issues[1].note.as_deref(),
            Some("Supervised true, managed false")
        );
    }

    #[test]
    fn test_out_of_date_os_note() {
        let mut device = healthy_device();
        device.os_version = "0.9".to_string();

        let issues =
            evaluate_device(&device, &models(), &carriers(), &sims(), Utc::now()).unwrap();
        assert_eq!(kinds(&issues), vec![IssueKind::OutOfDateOperatingSystem]);
        assert_eq!(
            issues[0].note.as_deref(),
            Some("Current version 0.9 < 1.0 expected for Tablet-5.")
        );
    }

    #[test]
    fn test_no_sim_device_skips_carrier_and_directory_rules() {
        let mut device = healthy_device();
        device.iccid = NO_SIM.to_string();
        device.tags.clear();

        let issues = evaluate_device(&device, &models(), &carriers(), &[], Utc::now()).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_carrier_stops_evaluation() {
        let mut device = healthy_device();
        device.iccid = "8901410000000000001".to_string();

        let issues = evaluate_device(&device, &models(), &carriers(), &[], Utc::now()).unwrap();
        assert_eq!(kinds(&issues), vec![IssueKind::UnknownCarrier]);
        assert_eq!(
            issues[0].note.as_deref(),
            Some("ICCID '8901410000000000001'")
        );
    }

    #[test]
    fn test_unapproved_carrier_stops_evaluation() {
        let mut carriers = carriers();
        carriers[0].approved = false;
        let device = healthy_device();

        let issues = evaluate_device(&device, &models(), &carriers, &[], Utc::now()).unwrap();
        assert_eq!(kinds(&issues), vec![IssueKind::UnapprovedCarrier]);
        assert_eq!(
            issues[0].note.as_deref(),
            Some("Unapproved carrier 'Alpha Mobile'.")
        );
    }

    #[test]
    fn test_missing_profile_tag_then_directory_rules_still_run() {
        let mut device = healthy_device();
        device.tags.clear();
        device.tags.insert("wifi".to_string());

        let issues = evaluate_device(&device, &models(), &carriers(), &[], Utc::now()).unwrap();
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::MissingCarrierProfile, IssueKind::IccidNotFound]
        );
        assert_eq!(
            issues[0].note.as_deref(),
            Some("Tags 'wifi' does not contain 'alpha-profile'.")
        );
        assert!(issues[1].note.is_none());
    }

    #[test]
    fn test_sim_label_mismatch() {
        let mut sims = sims();
        sims[0].unique_name = Some("Old label".to_string());
        let device = healthy_device();

        let issues =
            evaluate_device(&device, &models(), &carriers(), &sims, Utc::now()).unwrap();
        assert_eq!(kinds(&issues), vec![IssueKind::SimBadLabel]);
        assert_eq!(
            issues[0].note.as_deref(),
            Some("Currently named 'Old label' instead of device serial.")
        );
    }

    #[test]
    fn test_unlabeled_sim_reports_bad_label() {
        let mut sims = sims();
        sims[0].unique_name = None;
        let device = healthy_device();

        let issues =
            evaluate_device(&device, &models(), &carriers(), &sims, Utc::now()).unwrap();
        assert_eq!(kinds(&issues), vec![IssueKind::SimBadLabel]);
    }

    #[test]
    fn test_bad_name_reported_once_not_twice() {
        let mut device = healthy_device();
        device.name = "Front desk".to_string();

        let issues =
            evaluate_device(&device, &models(), &carriers(), &sims(), Utc::now()).unwrap();
        assert_eq!(kinds(&issues), vec![IssueKind::Name]);
        assert_eq!(issues[0].note.as_deref(), Some("Named 'Front desk'."));
    }

    #[test]
    fn test_malformed_os_version_fails_the_device() {
        let mut device = healthy_device();
        device.os_version = "2.x".to_string();

        let result = evaluate_device(&device, &models(), &carriers(), &sims(), Utc::now());
        assert!(matches!(result, Err(DiagError::OsVersion { .. })));
    }
}
