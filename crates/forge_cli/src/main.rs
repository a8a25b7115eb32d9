//! Forge CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error (missing or unreadable credential/settings)
//! - 4: Generation failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod clipboard;
mod commands;

use commands::{Cli, CliContext, CliError, Commands};
use forge_core::CoreError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIGURATION_ERROR: u8 = 3;
    pub const GENERATION_FAILURE: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "forge=debug"
    } else if cli.quiet {
        "forge=warn"
    } else {
        "forge=info"
    };
    let mut filter = EnvFilter::from_default_env();
    for directive in [default_level, "warn"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let context = CliContext::from_cli(&cli);

    let result = match cli.command {
        Commands::Build(args) => commands::build::execute(args, &context).await,
        Commands::Studio(args) => commands::studio::execute(args, &context).await,
        Commands::Config(args) => commands::config::execute(args, &context).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(cli_err) = e.downcast_ref::<CliError>() {
        return match cli_err {
            CliError::BuildFailed(_) => ExitCodes::GENERATION_FAILURE,
            CliError::Cancelled => ExitCodes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => ExitCodes::INVALID_ARGS,
        };
    }

    if let Some(core_err) = e.downcast_ref::<CoreError>() {
        return match core_err {
            CoreError::MissingCredential | CoreError::Settings(_) => ExitCodes::CONFIGURATION_ERROR,
            CoreError::Validation(_) | CoreError::OutOfBounds { .. } => ExitCodes::INVALID_ARGS,
            _ => ExitCodes::GENERAL_ERROR,
        };
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("settings") || msg.contains("api key") {
        ExitCodes::CONFIGURATION_ERROR
    } else if msg.contains("argument") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
