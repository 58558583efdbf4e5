//! Whole-run driver and its report.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use restamp_at::{TransformCatalog, UnresolvedEntry};
use restamp_syntax::{TextEdit, apply_edits, line_of_offset};
use tracing::{info, info_span};

use crate::error::RunError;
use crate::orchestrator::{AppliedTransform, MemberFailure, Orchestrator, UnitOutcome};
use crate::source::{SourceFile, SourceSet};

/// One contiguous block of changed lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// One-based line of the first changed line in the original text.
    pub line: usize,
    /// Original text of the affected lines.
    pub removed: String,
    /// Rewritten text of the same lines.
    pub added: String,
}

/// The rewritten text of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRewrite {
    path: PathBuf,
    original: String,
    rewritten: String,
    edits: Vec<TextEdit>,
}

impl FileRewrite {
    /// Applies `edits` to `original`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Syntax`] when the edits overlap or fall outside
    /// the text.
    pub fn new(path: &Path, original: &str, mut edits: Vec<TextEdit>) -> Result<Self, RunError> {
        edits.sort_by_key(|edit| edit.range().start);
        let rewritten =
            apply_edits(original, &edits).map_err(|source| RunError::syntax(path, source))?;
        Ok(Self {
            path: path.to_path_buf(),
            original: original.to_owned(),
            rewritten,
            edits,
        })
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the text before rewriting.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Returns the text after rewriting.
    #[must_use]
    pub fn rewritten(&self) -> &str {
        &self.rewritten
    }

    /// Returns the applied edits in source order.
    #[must_use]
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Groups the edits into whole-line hunks.
    ///
    /// Edits that share a line share a hunk.
    #[must_use]
    pub fn hunks(&self) -> Vec<Hunk> {
        let mut hunks = Vec::new();
        let mut removed_before = 0_usize;
        let mut added_before = 0_usize;
        let mut pending: Option<HunkSpan> = None;

        for edit in &self.edits {
            let range = edit.range();
            let (changed_start, changed_end) = changed_span(&self.original, edit);
            let start = line_start(&self.original, changed_start);
            let end = line_end(&self.original, changed_end);
            let removed = range.end.saturating_sub(range.start);
            let added = edit.replacement().len();

            match pending.as_mut() {
                Some(span) if start <= span.end => {
                    span.end = end;
                    span.removed_through = span.removed_through.saturating_add(removed);
                    span.added_through = span.added_through.saturating_add(added);
                }
                _ => {
                    if let Some(span) = pending.take() {
                        hunks.push(self.hunk(&span));
                    }
                    pending = Some(HunkSpan {
                        start,
                        end,
                        removed_before,
                        added_before,
                        removed_through: removed_before.saturating_add(removed),
                        added_through: added_before.saturating_add(added),
                    });
                }
            }
            removed_before = removed_before.saturating_add(removed);
            added_before = added_before.saturating_add(added);
        }
        if let Some(span) = pending {
            hunks.push(self.hunk(&span));
        }
        hunks
    }

    fn hunk(&self, span: &HunkSpan) -> Hunk {
        let new_start = span
            .start
            .saturating_sub(span.removed_before)
            .saturating_add(span.added_before);
        let new_end = span
            .end
            .saturating_sub(span.removed_through)
            .saturating_add(span.added_through);
        Hunk {
            line: line_of_offset(&self.original, span.start),
            removed: self
                .original
                .get(span.start..span.end)
                .unwrap_or_default()
                .to_owned(),
            added: self
                .rewritten
                .get(new_start..new_end)
                .unwrap_or_default()
                .to_owned(),
        }
    }

    /// Writes the rewritten text over the original file.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Io`] when the file cannot be written.
    pub fn write(&self) -> Result<(), RunError> {
        fs::write(&self.path, &self.rewritten).map_err(|source| RunError::io(&self.path, source))
    }
}

/// Byte span of a hunk in the original text plus the running edit totals
/// needed to locate it in the rewritten text.
struct HunkSpan {
    start: usize,
    end: usize,
    removed_before: usize,
    added_before: usize,
    removed_through: usize,
    added_through: usize,
}

/// Narrows an edit to the bytes that actually differ, so unchanged leading
/// line breaks do not pull neighbouring lines into a hunk.
fn changed_span(original: &str, edit: &TextEdit) -> (usize, usize) {
    let range = edit.range();
    let old = original.get(range.clone()).unwrap_or_default();
    let new = edit.replacement();
    let prefix: usize = old
        .chars()
        .zip(new.chars())
        .take_while(|(left, right)| left == right)
        .map(|(left, _)| left.len_utf8())
        .sum();
    let suffix: usize = old
        .get(prefix..)
        .unwrap_or_default()
        .chars()
        .rev()
        .zip(new.get(prefix..).unwrap_or_default().chars().rev())
        .take_while(|(left, right)| left == right)
        .map(|(left, _)| left.len_utf8())
        .sum();
    (
        range.start.saturating_add(prefix),
        range.end.saturating_sub(suffix),
    )
}

fn line_start(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .and_then(|prefix| prefix.rfind('\n'))
        .map_or(0, |newline| newline.saturating_add(1))
}

fn line_end(text: &str, offset: usize) -> usize {
    text.get(offset..)
        .and_then(|suffix| suffix.find('\n'))
        .map_or(text.len(), |newline| offset.saturating_add(newline))
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    rewrites: Vec<FileRewrite>,
    applied: Vec<AppliedTransform>,
    failures: Vec<MemberFailure>,
    unresolved: Vec<UnresolvedEntry>,
}

impl RunReport {
    /// Returns the files whose text changed.
    #[must_use]
    pub fn rewrites(&self) -> &[FileRewrite] {
        &self.rewrites
    }

    /// Returns every transform matched to a declaration.
    #[must_use]
    pub fn applied(&self) -> &[AppliedTransform] {
        &self.applied
    }

    /// Returns members skipped because their signatures did not resolve.
    #[must_use]
    pub fn failures(&self) -> &[MemberFailure] {
        &self.failures
    }

    /// Returns transforms that no declaration claimed.
    #[must_use]
    pub fn unresolved(&self) -> &[UnresolvedEntry] {
        &self.unresolved
    }

    /// Writes every rewrite to disk.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be written.
    pub fn write_all(&self) -> Result<(), RunError> {
        for rewrite in &self.rewrites {
            rewrite.write()?;
            info!(path = %rewrite.path().display(), "rewrote source file");
        }
        Ok(())
    }
}

/// Entry point for loading sources and applying a catalog to them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Restamp {
    threads: Option<usize>,
}

impl Restamp {
    /// Creates a runner using rayon's default worker count.
    #[must_use]
    pub const fn new() -> Self {
        Self { threads: None }
    }

    /// Overrides the worker count; `None` keeps rayon's default.
    #[must_use]
    pub const fn with_threads(self, threads: Option<usize>) -> Self {
        Self { threads }
    }

    /// Loads and parses `paths`.
    ///
    /// # Errors
    ///
    /// Fails when the worker pool cannot start or a file cannot be read or
    /// parsed.
    pub fn load(&self, paths: &[PathBuf]) -> Result<SourceSet, RunError> {
        let _span = info_span!("load", files = paths.len()).entered();
        self.install(|| SourceSet::load(paths))?
    }

    /// Applies `catalog` to every file of `sources`.
    ///
    /// Files are processed in parallel; the report keeps the source set's
    /// order. Unclaimed transforms are collected after all files finish.
    ///
    /// # Errors
    ///
    /// Fails when the worker pool cannot start or edits cannot be applied.
    pub fn run(&self, sources: &SourceSet, catalog: &TransformCatalog) -> Result<RunReport, RunError> {
        let _span = info_span!("run", files = sources.files().len()).entered();
        let orchestrator = Orchestrator::new(catalog, sources.index(), sources.hierarchy());
        let outcomes = self.install(|| {
            sources
                .files()
                .par_iter()
                .map(|file| process_file(&orchestrator, file))
                .collect::<Result<Vec<_>, RunError>>()
        })??;

        let mut report = RunReport::default();
        for (rewrite, outcome) in outcomes {
            report.rewrites.extend(rewrite);
            report.applied.extend(outcome.applied);
            report.failures.extend(outcome.failures);
        }
        report.unresolved = catalog.unresolved_entries();
        info!(
            rewritten = report.rewrites.len(),
            applied = report.applied.len(),
            failures = report.failures.len(),
            unresolved = report.unresolved.len(),
            "run complete"
        );
        Ok(report)
    }

    /// Runs `work` on a dedicated pool when a thread count is configured,
    /// otherwise on the global rayon pool.
    pub(crate) fn install<T, F>(&self, work: F) -> Result<T, RunError>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        let Some(threads) = self.threads else {
            return Ok(work());
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|error| RunError::ThreadPool {
                message: error.to_string(),
            })?;
        Ok(pool.install(work))
    }
}

fn process_file(
    orchestrator: &Orchestrator<'_>,
    file: &SourceFile,
) -> Result<(Option<FileRewrite>, UnitOutcome), RunError> {
    let mut outcome = orchestrator.process_unit(file.path(), file.unit());
    let edits = std::mem::take(&mut outcome.edits);
    let rewrite = if edits.is_empty() {
        None
    } else {
        Some(FileRewrite::new(file.path(), file.text(), edits)?)
    };
    Ok((rewrite, outcome))
}
