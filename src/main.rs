//! APM - Android Project Manager
//!
//! Command line entry point.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use apm::commands::{SetupCommand, StatusCommand};
use apm::core::{APP_NAME, VERSION};
use apm::toolchain::InstallError;

/// Environment variable with the log filter
const LOG_ENV: &str = "APM_LOG";

#[derive(Debug, Parser)]
#[command(name = "apm", version, about = "Android Project Manager")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download and install the Android SDK
    Setup(SetupCommand),
    /// Show the installed SDK version and files
    Status(StatusCommand),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr to keep them apart from progress output.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("{} v{}: {:?}", APP_NAME, VERSION, cli.command);

    let result = match &cli.command {
        Command::Setup(cmd) => cmd.execute().await,
        Command::Status(cmd) => cmd.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let reported = e
                .downcast_ref::<InstallError>()
                .map_or(false, InstallError::is_reported);
            if !reported {
                eprintln!("error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
