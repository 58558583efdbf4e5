//! CLI argument definitions for restamp.

use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

/// Applies access transformers to Java sources in place.
#[derive(Parser, Debug)]
#[command(name = "restamp", version)]
pub(crate) struct Cli {
    /// Access-transformer file to apply.
    #[arg(short = 'a', long = "transformers", value_name = "FILE")]
    pub(crate) transformers: PathBuf,
    /// Root directory of the Java sources.
    #[arg(long, value_name = "DIR")]
    pub(crate) source_root: PathBuf,
    /// Adds the file declaring each transformed class to the inputs.
    #[arg(long)]
    pub(crate) from_transformers: bool,
    /// Reports the changes without writing any file.
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Fails when any transformer is left unapplied.
    #[arg(long)]
    pub(crate) strict: bool,
    /// Controls how the report is rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// Java files or directories to process; defaults to the source root.
    #[arg(value_name = "INPUTS")]
    pub(crate) inputs: Vec<PathBuf>,
}
