//! One-shot fleet setup pass

use std::process::ExitCode;

use crate::config::Settings;
use crate::errors::SwitchError;
use crate::export;
use crate::provider::http::HttpRegistry;
use crate::report;
use crate::setup::{run_setup, SetupReport};

/// Relabel provider SIMs to match the devices they sit in
pub async fn setup(settings: Settings) -> ExitCode {
    match setup_impl(settings).await {
        Ok(report) => {
            for serial in &report.missing {
                report::warning(&format!("No SIM registered for {}", serial));
            }
            report::success(&format!(
                "\n[SUCCESS] Setup complete: {} checked, {} relabeled, {} missing.",
                report.checked,
                report.relabeled,
                report.missing.len()
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            report::failure(&format!("\n[ERROR] Setup failed: {}", e));
            ExitCode::FAILURE
        }
    }
}

async fn setup_impl(settings: Settings) -> Result<SetupReport, SwitchError> {
    let diag = settings.diag.clone();

    report::status("Loading devices... ");
    let load = export::load_devices(&diag.device_file).await?;
    report::success(&format!("{} retrieved.", load.devices.len()));

    report::status("Loading carrier catalog... ");
    let carriers = export::load_carrier_catalog(&diag.carrier_file).await?;
    report::success(&format!("{} retrieved.", carriers.len()));

    let registry = HttpRegistry::new(settings.provider)?;
    run_setup(&load.devices, &carriers, &registry).await
}
