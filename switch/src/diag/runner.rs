//! Fleet-wide diagnostic runs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{error, info};

use crate::diag::engine::evaluate_device;
use crate::diag::issue::Issue;
use crate::models::device::Device;
use crate::models::policy::{CarrierPolicy, ModelPolicy};
use crate::models::sim::SimRecord;
use crate::report::IssueSink;

/// Immutable inputs shared by every device evaluation in a run
pub struct DiagSnapshot {
    pub models: Vec<ModelPolicy>,
    pub carriers: Vec<CarrierPolicy>,
    pub sims: Vec<SimRecord>,
    pub now: DateTime<Utc>,
}

/// A device that could not be evaluated during a run
#[derive(Debug, Clone)]
pub struct DeviceFailure {
    pub serial: String,
    pub reason: String,
}

/// Outcome summary of a diagnostic run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub devices_checked: usize,
    pub issue_count: usize,
    pub failures: Vec<DeviceFailure>,
}

/// Evaluate every device against the snapshot and push findings into `sink`
///
/// Devices are evaluated concurrently but findings are emitted in fleet
/// order, so two runs over the same inputs produce the same output. A device
/// that fails to evaluate is recorded in the report and skipped; it never
/// aborts the run.
pub async fn run_diagnostics(
    devices: Vec<Device>,
    snapshot: DiagSnapshot,
    sink: &mut dyn IssueSink,
) -> RunReport {
    let snapshot = Arc::new(snapshot);
    info!("Evaluating {} devices", devices.len());

    let handles: Vec<_> = devices
        .into_iter()
        .map(|device| {
            let snap = Arc::clone(&snapshot);
            tokio::spawn(async move {
                let result = evaluate_device(
                    &device,
                    &snap.models,
                    &snap.carriers,
                    &snap.sims,
                    snap.now,
                );
                (device.serial, result)
            })
        })
        .collect();

    let mut report = RunReport {
        devices_checked: handles.len(),
        issue_count: 0,
        failures: Vec::new(),
    };

    for joined in join_all(handles).await {
        match joined {
            Ok((_, Ok(issues))) => {
                for issue in issues {
                    sink.emit(&issue);
                    report.issue_count += 1;
                }
            }
            Ok((serial, Err(err))) => {
                error!("Skipping device {}: {}", serial, err);
                report.failures.push(DeviceFailure {
                    serial,
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                error!("Device evaluation task failed: {}", err);
                report.failures.push(DeviceFailure {
                    serial: "unknown".to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        "Run complete: {} issues across {} devices, {} skipped",
        report.issue_count,
        report.devices_checked,
        report.failures.len()
    );
    report
}
