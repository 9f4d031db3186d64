//! Package smoke binary.
//!
//! Registers the calculator steps, prints `Bincrafters` and exits. A
//! registration failure exits with status 1 before anything is printed; an
//! invalid configuration exits with status 2.

use std::process::ExitCode;

use clap::Parser;
use cukebind_test_package::config::{AppConfig, LogLevel};
use cukebind_test_package::logging::init_logging;
use cukebind_test_package::{AppError, calculator_registry};

/// Calculator step package for cukebind.
#[derive(Parser, Debug)]
#[command(name = "test_package", version, about)]
struct Args {
    /// Log level (trace, debug, info, warn, error); overrides CUKEBIND_LOG_LEVEL.
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&AppConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::from(e.exit_status());
        }
    };
    init_logging(&config);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "test package failed");
            ExitCode::from(e.exit_status())
        }
    }
}

fn build_config(args: &Args) -> Result<AppConfig, AppError> {
    Ok(AppConfig::from_env()?.apply_overrides(args.log_level))
}

#[expect(clippy::print_stdout, reason = "the package's only output")]
fn run() -> Result<(), AppError> {
    let registry = calculator_registry()?;
    tracing::debug!(steps = registry.len(), "calculator steps registered");
    println!("Bincrafters");
    Ok(())
}
