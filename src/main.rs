//! # pgforge CLI
//!
//! Binary entry point for the `pgforge` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Handling top-level application errors and translating them into
//!   user-friendly output.
//!
//! The core application logic lives in the library crate; the binary is a
//! thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use console::style;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style(e).red());
            ExitCode::FAILURE
        }
    }
}
