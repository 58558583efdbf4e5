//! Rendering of run reports.
//!
//! Human output lists each rewritten file with its changed lines, then
//! skipped members and unapplied transformers, then a one-line summary.
//! JSON output carries the same content as a single document.

mod human;
mod json;

use std::io::Write;

use clap::ValueEnum;
use restamp_core::RunReport;

use crate::AppError;

/// Output format selection for the run report.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render human-readable output.
    Human,
    /// Always emit a JSON document.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Human-readable hunks and summary.
    Human,
    /// A JSON document.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto => {
                if stdout_is_terminal {
                    ResolvedOutputFormat::Human
                } else {
                    ResolvedOutputFormat::Json
                }
            }
            Self::Human => ResolvedOutputFormat::Human,
            Self::Json => ResolvedOutputFormat::Json,
        }
    }
}

/// Settings for rendering a report.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OutputSettings {
    pub(crate) format: ResolvedOutputFormat,
    pub(crate) dry_run: bool,
}

pub(crate) fn render_report<W: Write>(
    report: &RunReport,
    settings: OutputSettings,
    out: &mut W,
) -> Result<(), AppError> {
    match settings.format {
        ResolvedOutputFormat::Human => {
            human::render(report, settings.dry_run, out).map_err(AppError::WriteOutput)?;
        }
        ResolvedOutputFormat::Json => json::render(report, settings.dry_run, out)?,
    }
    out.flush().map_err(AppError::WriteOutput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OutputFormat::Auto, true, ResolvedOutputFormat::Human)]
    #[case(OutputFormat::Auto, false, ResolvedOutputFormat::Json)]
    #[case(OutputFormat::Human, false, ResolvedOutputFormat::Human)]
    #[case(OutputFormat::Json, true, ResolvedOutputFormat::Json)]
    fn auto_follows_the_terminal(
        #[case] format: OutputFormat,
        #[case] terminal: bool,
        #[case] expected: ResolvedOutputFormat,
    ) {
        assert_eq!(format.resolve(terminal), expected);
    }
}
