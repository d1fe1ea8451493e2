//! Fleet export and catalog file loading

use std::path::Path;

use tracing::warn;

use crate::errors::SwitchError;
use crate::models::device::Device;
use crate::models::policy::{CarrierPolicy, ModelPolicy};

/// A device record that could not be parsed from the export
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    pub index: usize,
    pub serial: String,
    pub reason: String,
}

/// Devices parsed from a fleet export, with per-record failures kept aside
#[derive(Debug)]
pub struct DeviceLoad {
    pub devices: Vec<Device>,
    pub skipped: Vec<SkippedRecord>,
}

async fn read_file(path: &Path) -> Result<String, SwitchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SwitchError::ExportError(format!("{}: {}", path.display(), e)))
}

/// Load the device fleet export
///
/// Malformed records are skipped with a warning instead of failing the whole
/// export. A file that is not a JSON array at all is an error.
pub async fn load_devices(path: impl AsRef<Path>) -> Result<DeviceLoad, SwitchError> {
    let path = path.as_ref();
    let raw = read_file(path).await?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
        .map_err(|e| SwitchError::ExportError(format!("{}: {}", path.display(), e)))?;

    let mut devices = Vec::with_capacity(values.len());
    let mut skipped = Vec::new();

    for (index, value) in values.into_iter().enumerate() {
        let serial = value
            .get("serial")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        match serde_json::from_value::<Device>(value) {
            Ok(device) => devices.push(device),
            Err(e) => {
                warn!("Skipping device record {} ({}): {}", index, serial, e);
                skipped.push(SkippedRecord {
                    index,
                    serial,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(DeviceLoad { devices, skipped })
}

/// Load the model catalog. Order is preserved for the matcher.
pub async fn load_model_catalog(path: impl AsRef<Path>) -> Result<Vec<ModelPolicy>, SwitchError> {
    let path = path.as_ref();
    let raw = read_file(path).await?;
    serde_json::from_str(&raw)
        .map_err(|e| SwitchError::ExportError(format!("{}: {}", path.display(), e)))
}

/// Load the carrier catalog. Order is preserved for the matcher.
pub async fn load_carrier_catalog(
    path: impl AsRef<Path>,
) -> Result<Vec<CarrierPolicy>, SwitchError> {
    let path = path.as_ref();
    let raw = read_file(path).await?;
    serde_json::from_str(&raw)
        .map_err(|e| SwitchError::ExportError(format!("{}: {}", path.display(), e)))
}
