//! `rulediff` binary: argument parsing, logging setup and exit status.

use rulediff::cli::Cli;
use rulediff::{commands, exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {}", err);
    }

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("rulediff: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
