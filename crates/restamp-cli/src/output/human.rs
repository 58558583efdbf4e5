//! Human-readable report rendering.

use std::io::{self, Write};

use restamp_core::{Hunk, RunReport};

pub(super) fn render<W: Write>(report: &RunReport, dry_run: bool, out: &mut W) -> io::Result<()> {
    for rewrite in report.rewrites() {
        writeln!(out, "--- {}", rewrite.path().display())?;
        for hunk in rewrite.hunks() {
            write_hunk(out, &hunk)?;
        }
    }
    for failure in report.failures() {
        writeln!(
            out,
            "skipped {}:{}: {}",
            failure.path.display(),
            failure.line,
            failure.error
        )?;
    }
    for entry in report.unresolved() {
        writeln!(out, "unapplied {entry}")?;
    }

    let verb = if dry_run { "would be rewritten" } else { "rewritten" };
    writeln!(
        out,
        "{} file(s) {verb}, {} transform(s) matched, {} member(s) skipped, {} class(es) with unapplied transforms",
        report.rewrites().len(),
        report.applied().len(),
        report.failures().len(),
        report.unresolved().len(),
    )
}

fn write_hunk<W: Write>(out: &mut W, hunk: &Hunk) -> io::Result<()> {
    writeln!(out, "@@ line {}", hunk.line)?;
    for line in hunk.removed.lines() {
        writeln!(out, "-{line}")?;
    }
    for line in hunk.added.lines() {
        writeln!(out, "+{line}")?;
    }
    Ok(())
}
