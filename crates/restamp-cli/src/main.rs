//! CLI entrypoint for restamp.
//!
//! The binary delegates to [`restamp_cli::run`], which loads configuration,
//! parses arguments, applies the transformers, and reports the outcome.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    restamp_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
