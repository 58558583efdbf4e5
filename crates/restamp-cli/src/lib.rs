//! Command-line interface runtime for restamp.
//!
//! The module owns argument parsing, configuration bootstrapping, telemetry,
//! and report rendering. The runtime can be exercised from the binary
//! entrypoint and from tests where configuration loading and IO streams are
//! substituted.

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use restamp_at::{TransformCatalog, UnappliedTransformsError, read_transformers};
use restamp_config::Config;
use restamp_core::{Restamp, RunReport, SourceSelection};
use tracing::info;

mod cli;
mod config;
mod errors;
pub mod output;
mod telemetry;

use cli::Cli;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
pub use output::{OutputFormat, ResolvedOutputFormat};
use output::{OutputSettings, render_report};

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: This list must be kept in sync with the fields of
/// `restamp_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &["--config-path", "--log-filter", "--log-format", "--threads"];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal: io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn with_terminal_status(
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }

    pub(crate) const fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    match execute(&args, io, loader) {
        Ok(exit_code) => exit_code,
        Err(error) => {
            drop(writeln!(io.stderr, "{error}"));
            ExitCode::FAILURE
        }
    }
}

fn execute<W, E, L>(
    args: &[OsString],
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> Result<ExitCode, AppError>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let split = split_config_arguments(args);
    let cli = match Cli::try_parse_from(prepare_cli_arguments(args, &split)) {
        Ok(cli) => cli,
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(io.stdout, "{error}").map_err(AppError::WriteOutput)?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(error) => return Err(AppError::CliUsage(error)),
    };
    let config = loader.load(&split.config_arguments)?;
    telemetry::initialise(&config)?;

    let report = apply(&cli, &config)?;
    let settings = OutputSettings {
        format: cli.output.resolve(io.stdout_is_terminal()),
        dry_run: cli.dry_run,
    };

    if (cli.strict || config.strict()) && !report.unresolved().is_empty() {
        render_report(&report, settings, &mut *io.stdout)?;
        return Err(UnappliedTransformsError::new(report.unresolved().to_vec()).into());
    }

    if !cli.dry_run {
        report.write_all()?;
    }
    render_report(&report, settings, &mut *io.stdout)?;
    Ok(ExitCode::SUCCESS)
}

/// Loads the transformers and sources, then runs the catalog over them.
fn apply(cli: &Cli, config: &Config) -> Result<RunReport, AppError> {
    let transforms = read_transformers(&cli.transformers)?;
    let files = SourceSelection::new(&cli.source_root)
        .with_inputs(cli.inputs.iter().cloned())
        .from_transformers(cli.from_transformers)
        .resolve(&transforms)?;
    info!(
        transformers = %cli.transformers.display(),
        files = files.len(),
        dry_run = cli.dry_run,
        "applying access transformers"
    );

    let restamp = Restamp::new().with_threads(config.threads());
    let sources = restamp.load(&files)?;
    let catalog = TransformCatalog::new(transforms);
    Ok(restamp.run(&sources, &catalog)?)
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.get(split.command_start..).unwrap_or_default())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests;
