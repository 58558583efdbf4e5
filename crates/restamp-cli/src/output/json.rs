//! JSON report rendering.

use std::io::Write;

use restamp_core::RunReport;
use serde::Serialize;

use crate::AppError;

#[derive(Debug, Serialize)]
struct ReportDocument {
    dry_run: bool,
    files: Vec<FileDocument>,
    failures: Vec<FailureDocument>,
    unapplied: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FileDocument {
    path: String,
    hunks: Vec<HunkDocument>,
}

#[derive(Debug, Serialize)]
struct HunkDocument {
    line: usize,
    removed: String,
    added: String,
}

#[derive(Debug, Serialize)]
struct FailureDocument {
    path: String,
    line: u32,
    message: String,
}

impl ReportDocument {
    fn new(report: &RunReport, dry_run: bool) -> Self {
        Self {
            dry_run,
            files: report
                .rewrites()
                .iter()
                .map(|rewrite| FileDocument {
                    path: rewrite.path().display().to_string(),
                    hunks: rewrite
                        .hunks()
                        .into_iter()
                        .map(|hunk| HunkDocument {
                            line: hunk.line,
                            removed: hunk.removed,
                            added: hunk.added,
                        })
                        .collect(),
                })
                .collect(),
            failures: report
                .failures()
                .iter()
                .map(|failure| FailureDocument {
                    path: failure.path.display().to_string(),
                    line: failure.line,
                    message: failure.error.to_string(),
                })
                .collect(),
            unapplied: report.unresolved().iter().map(ToString::to_string).collect(),
        }
    }
}

pub(super) fn render<W: Write>(
    report: &RunReport,
    dry_run: bool,
    out: &mut W,
) -> Result<(), AppError> {
    let document = ReportDocument::new(report, dry_run);
    serde_json::to_writer_pretty(&mut *out, &document).map_err(AppError::SerialiseReport)?;
    out.write_all(b"\n").map_err(AppError::WriteOutput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::report_for;

    #[test]
    fn documents_list_files_and_leftovers() {
        let report = report_for(
            "package p;\n\nclass A {\n    protected final int limit;\n}\n",
            "public-f p.A limit\npublic p.A missing()V\n",
        );
        let mut out = Vec::new();

        render(&report, false, &mut out).expect("render");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(
            value,
            serde_json::json!({
                "dry_run": false,
                "files": [{
                    "path": "p/A.java",
                    "hunks": [{
                        "line": 4,
                        "removed": "    protected final int limit;",
                        "added": "    public int limit;",
                    }],
                }],
                "failures": [],
                "unapplied": ["p.A: [] {missing()V}"],
            })
        );
    }
}
