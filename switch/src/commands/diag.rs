//! One-shot fleet diagnostic run

use std::collections::HashMap;
use std::process::ExitCode;

use chrono::Utc;
use tracing::info;

use crate::config::Settings;
use crate::diag::issue::Issue;
use crate::diag::runner::{run_diagnostics, DiagSnapshot, RunReport};
use crate::errors::SwitchError;
use crate::export;
use crate::provider::http::HttpRegistry;
use crate::provider::SimRegistry;
use crate::report::{self, ConsoleSink, IssueSink};

/// Evaluate the fleet export and print findings
///
/// Exits non-zero when any issue was found or any device failed to
/// evaluate, so scheduled runs can alert on the exit code.
pub async fn diag(settings: Settings, cli_args: &HashMap<String, String>) -> ExitCode {
    match diag_impl(settings, cli_args).await {
        Ok(run) if run.issue_count == 0 && run.failures.is_empty() => {
            report::success(&format!(
                "\nFleet is clean: {} devices checked.",
                run.devices_checked
            ));
            ExitCode::SUCCESS
        }
        Ok(run) => {
            report::warning(&format!(
                "\n{} issues across {} devices, {} skipped.",
                run.issue_count,
                run.devices_checked,
                run.failures.len()
            ));
            ExitCode::FAILURE
        }
        Err(e) => {
            report::failure(&format!("\n[ERROR] Diagnostic run failed: {}", e));
            ExitCode::FAILURE
        }
    }
}

async fn diag_impl(
    settings: Settings,
    cli_args: &HashMap<String, String>,
) -> Result<RunReport, SwitchError> {
    let diag = settings.diag.clone();

    report::status("Loading SIM registry... ");
    let registry = HttpRegistry::new(settings.provider)?;
    let sims = registry.fetch_all().await?;
    report::success(&format!("{} retrieved.", sims.len()));

    report::status("Loading devices... ");
    let load = export::load_devices(&diag.device_file).await?;
    report::success(&format!("{} retrieved.", load.devices.len()));
    for skip in &load.skipped {
        report::warning(&format!(
            "Skipped record {} ({}): {}",
            skip.index, skip.serial, skip.reason
        ));
    }

    report::status("Loading model catalog... ");
    let models = export::load_model_catalog(&diag.model_file).await?;
    report::success(&format!("{} retrieved.", models.len()));

    report::status("Loading carrier catalog... ");
    let carriers = export::load_carrier_catalog(&diag.carrier_file).await?;
    report::success(&format!("{} retrieved.", carriers.len()));

    println!();

    let snapshot = DiagSnapshot {
        models,
        carriers,
        sims,
        now: Utc::now(),
    };
    let mut issues: Vec<Issue> = Vec::new();
    let run = run_diagnostics(load.devices, snapshot, &mut issues).await;

    let mut console = ConsoleSink::new(diag.console_link_template.clone());
    for issue in &issues {
        console.emit(issue);
    }

    for failure in &run.failures {
        report::warning(&format!("Skipped {}: {}", failure.serial, failure.reason));
    }

    if let Some(path) = cli_args.get("output") {
        report::write_json_report(path, &issues).await?;
        info!("Report written to {}", path);
        println!("Report written to {}", path);
    }

    Ok(run)
}
