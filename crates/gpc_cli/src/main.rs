//! gpc - create a new project from a template.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Project creation failed
//! - 2: Invalid arguments (including no template source)

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use gpc_core::GpcError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::Cli;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    if !cli.has_source() {
        let _ = Cli::command().print_help();
        return ExitCode::from(ExitCodes::INVALID_ARGS);
    }

    match commands::create::execute(&cli) {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("Error creating the project: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn init_logging(cli: &Cli) {
    let directive = if cli.verbose {
        "gpc=debug"
    } else if cli.quiet {
        "warn"
    } else {
        "gpc=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // A second init (e.g. under a test harness) is harmless.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Arguments that name zero or several sources are usage errors.
fn exit_code_for(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<GpcError>() {
        Some(GpcError::NoTemplateSource | GpcError::MultipleTemplateSources(_)) => {
            ExitCodes::INVALID_ARGS
        }
        _ => ExitCodes::GENERAL_ERROR,
    }
}
