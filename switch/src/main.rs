//! simswitch - Entry Point
//!
//! Keeps a fleet's SIMs honest: serves the status reconciliation API by
//! default, with one-shot diagnostic and setup passes behind flags.

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::process::ExitCode;

use simswitch::app::options::AppOptions;
use simswitch::app::run::run;
use simswitch::commands;
use simswitch::config::Settings;
use simswitch::errors::SwitchError;
use simswitch::logs::{init_logging, LogOptions};
use simswitch::utils::version_info;

use tracing::{error, info};

const DEFAULT_CONFIG: &str = "config.json";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        println!("{}", serde_json::to_string_pretty(&version).unwrap());
        return ExitCode::SUCCESS;
    }

    // Retrieve the settings file
    let settings = match load_settings(&cli_args).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    // One-shot diagnostic run
    if cli_args.contains_key("diag") {
        return commands::diag::diag(settings, &cli_args).await;
    }

    // One-shot setup pass
    if cli_args.contains_key("setup") {
        return commands::setup::setup(settings).await;
    }

    // Run the server
    let options = AppOptions::from_settings(settings);
    info!("Running simswitch with options: {:?}", options);
    let result = run(options, await_shutdown_signal()).await;
    if let Err(e) = result {
        error!("Failed to run the service: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn load_settings(cli_args: &HashMap<String, String>) -> Result<Settings, SwitchError> {
    if let Some(path) = cli_args.get("config") {
        return Settings::load(path).await;
    }
    if Path::new(DEFAULT_CONFIG).exists() {
        return Settings::load(DEFAULT_CONFIG).await;
    }
    Ok(Settings::default())
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).unwrap();
        let mut sigint = signal(SignalKind::interrupt()).unwrap();

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Ctrl+C received, shutting down...");
    }
}
