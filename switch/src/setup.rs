//! One-shot fleet setup pass that relabels provider SIMs

use tracing::{info, warn};

use crate::catalog::match_carrier;
use crate::errors::SwitchError;
use crate::models::device::Device;
use crate::models::policy::CarrierPolicy;
use crate::provider::SimRegistry;

/// Summary of a setup pass
#[derive(Debug, Default)]
pub struct SetupReport {
    /// Devices whose SIM was checked against the provider
    pub checked: usize,

    /// SIMs whose label was rewritten to the device serial
    pub relabeled: usize,

    /// Serials whose ICCID has no SIM at the provider
    pub missing: Vec<String>,
}

/// Relabel provider SIMs so each carries the serial of the device it sits in
///
/// Only devices with a SIM from an approved carrier are considered. SIMs
/// already labeled with the right serial are left alone.
pub async fn run_setup(
    devices: &[Device],
    carriers: &[CarrierPolicy],
    registry: &dyn SimRegistry,
) -> Result<SetupReport, SwitchError> {
    let sims = registry.fetch_all().await?;
    info!(
        "Checking {} devices against {} SIMs",
        devices.len(),
        sims.len()
    );

    let mut report = SetupReport::default();

    for device in devices {
        if !device.has_sim() {
            continue;
        }
        let Some(carrier) = match_carrier(&device.iccid, carriers) else {
            continue;
        };
        if !carrier.approved {
            continue;
        }

        report.checked += 1;

        let Some(sim) = sims.iter().find(|sim| sim.iccid == device.iccid) else {
            warn!("No SIM registered for {} ({})", device.serial, device.iccid);
            report.missing.push(device.serial.clone());
            continue;
        };

        if sim.unique_name.as_deref() == Some(device.serial.as_str()) {
            continue;
        }

        info!("Relabeling SIM {} as {}", sim.sid, device.serial);
        registry.update_label(&sim.sid, &device.serial).await?;
        report.relabeled += 1;
    }

    info!(
        "Setup complete: {} relabeled, {} missing",
        report.relabeled,
        report.missing.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    use crate::models::device::NO_SIM;
    use crate::models::sim::{SimRecord, SimStatus};
    use crate::provider::memory::{MemoryRegistry, RegistryCall};

    fn device(serial: &str, iccid: &str) -> Device {
        Device {
            serial: serial.to_string(),
            name: serial.to_string(),
            model: "Tablet-5".to_string(),
            os_version: "2.0".to_string(),
            iccid: iccid.to_string(),
            supervised: true,
            managed: true,
            tags: BTreeSet::new(),
            last_seen: Utc::now(),
        }
    }

    fn carriers() -> Vec<CarrierPolicy> {
        vec![
            CarrierPolicy {
                name: "Alpha Mobile".to_string(),
                iccid_prefix: "8988307".to_string(),
                approved: true,
                configuration_profile: "alpha-profile".to_string(),
            },
            CarrierPolicy {
                name: "Beta Cell".to_string(),
                iccid_prefix: "89014".to_string(),
                approved: false,
                configuration_profile: "beta-profile".to_string(),
            },
        ]
    }

    fn sim(sid: &str, iccid: &str, unique_name: Option<&str>) -> SimRecord {
        SimRecord {
            sid: sid.to_string(),
            iccid: iccid.to_string(),
            unique_name: unique_name.map(|n| n.to_string()),
            status: SimStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_mislabeled_sim_gets_the_device_serial() {
        let registry = MemoryRegistry::new(vec![
            sim("001", "8988307000000000001", Some("Old label")),
            sim("002", "8988307000000000002", Some("SER-B")),
        ]);
        let devices = vec![
            device("SER-A", "8988307000000000001"),
            device("SER-B", "8988307000000000002"),
        ];

        let report = run_setup(&devices, &carriers(), &registry).await.unwrap();

        assert_eq!(report.checked, 2);
        assert_eq!(report.relabeled, 1);
        assert_eq!(
            registry.calls().await,
            vec![RegistryCall::UpdateLabel {
                sid: "001".to_string(),
                unique_name: "SER-A".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_unlabeled_sim_is_relabeled() {
        let registry = MemoryRegistry::new(vec![sim("001", "8988307000000000001", None)]);
        let devices = vec![device("SER-A", "8988307000000000001")];

        let report = run_setup(&devices, &carriers(), &registry).await.unwrap();
        assert_eq!(report.relabeled, 1);
    }

    #[tokio::test]
    async fn test_skips_devices_outside_approved_carriers() {
        let registry = MemoryRegistry::new(vec![sim("001", "8901400000000000001", Some("x"))]);
        let devices = vec![
            device("SER-A", NO_SIM),
            device("SER-B", "8901400000000000001"),
            device("SER-C", "7000000000000000001"),
        ];

        let report = run_setup(&devices, &carriers(), &registry).await.unwrap();

        assert_eq!(report.checked, 0);
        assert_eq!(report.relabeled, 0);
        assert!(registry.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_iccid_is_reported_not_fatal() {
        let registry = MemoryRegistry::new(vec![]);
        let devices = vec![device("SER-A", "8988307000000000001")];

        let report = run_setup(&devices, &carriers(), &registry).await.unwrap();

        assert_eq!(report.missing, vec!["SER-A".to_string()]);
        assert_eq!(report.relabeled, 0);
    }
}
