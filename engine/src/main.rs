// Engine main entry point
use engine::cli::{execute, parse_args};
use engine::config::settings::EngineSettings;
use engine::error::ErrorKind;
use engine::services::DashboardEngine;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let settings = match EngineSettings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Could not load settings");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting construction dashboard engine...");
    let engine = DashboardEngine::from_settings(settings);

    match execute(&engine, args.command).await {
        Ok(output) => {
            for warning in &output.warnings {
                warn!(%warning, "View rendered with a warning");
                eprintln!("warning: {}", warning);
            }
            eprintln!("{}", output.headline);
            println!("{}", output.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.kind() {
                ErrorKind::SourceUnreachable => {
                    eprintln!("No data available: {}", e);
                }
                ErrorKind::NotFound => eprintln!("{}", e),
                _ => {
                    error!(error = %e, "Command failed");
                    eprintln!("{}", e);
                }
            }
            ExitCode::FAILURE
        }
    }
}
