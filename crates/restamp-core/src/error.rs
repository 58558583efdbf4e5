//! Error types for signature resolution and whole runs.

use std::path::{Path, PathBuf};

use restamp_syntax::SyntaxError;
use thiserror::Error;

/// A member whose signature could not be mapped into descriptor form.
///
/// Resolution errors are local: the member is left untouched and every other
/// member is still processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolutionError {
    /// A parameter or return type could not be attributed.
    #[error("cannot resolve {context}: {reason}")]
    TypeResolution {
        /// What was being resolved, for example `parameter 2 of p.A.m`.
        context: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A parameter resolved to a type that cannot be a field type.
    #[error("{context} is not a field type: found {found}")]
    NonFieldParameterType {
        /// What was being resolved.
        context: String,
        /// The offending type.
        found: String,
    },
}

impl ResolutionError {
    /// Creates a type resolution error.
    #[must_use]
    pub fn type_resolution(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TypeResolution {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Creates a non-field parameter error.
    #[must_use]
    pub fn non_field(context: impl Into<String>, found: impl Into<String>) -> Self {
        Self::NonFieldParameterType {
            context: context.into(),
            found: found.into(),
        }
    }
}

/// Errors that end a run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    /// A source file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Selected source files do not exist.
    #[error("missing source files: {}", display_paths(paths))]
    MissingSourceFiles {
        /// Every path that was selected but not found.
        paths: Vec<PathBuf>,
    },

    /// A source file could not be parsed or edited.
    #[error("failed to process {}: {source}", path.display())]
    Syntax {
        /// File being processed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: SyntaxError,
    },

    /// The worker pool could not be created.
    #[error("failed to start worker pool: {message}")]
    ThreadPool {
        /// Description of the failure.
        message: String,
    },
}

impl RunError {
    /// Creates an I/O error for `path`.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a syntax error for `path`.
    #[must_use]
    pub fn syntax(path: &Path, source: SyntaxError) -> Self {
        Self::Syntax {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
