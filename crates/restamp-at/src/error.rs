//! Error types for access-transformer loading and validation.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::UnresolvedEntry;

/// Errors raised while parsing JVM type descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid descriptor `{descriptor}`: {message}")]
pub struct DescriptorError {
    /// The descriptor text that failed to parse.
    pub descriptor: String,
    /// Description of the failure.
    pub message: String,
}

impl DescriptorError {
    /// Creates a descriptor error for the given input.
    #[must_use]
    pub fn new(descriptor: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading access-transformer files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    /// The transformer file could not be read.
    #[error("failed to read access transformers from {}: {source}", path.display())]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// A line could not be parsed.
    #[error("line {line}: {message}")]
    InvalidLine {
        /// One-based line number.
        line: usize,
        /// Description of the failure.
        message: String,
    },

    /// A wildcard member entry was encountered.
    #[error("line {line}: wildcard entries are not supported")]
    UnsupportedWildcard {
        /// One-based line number.
        line: usize,
    },
}

impl FormatError {
    /// Creates an invalid line error.
    #[must_use]
    pub fn invalid_line(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidLine {
            line,
            message: message.into(),
        }
    }

    /// Attaches a file path to an I/O failure.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Raised when transforms remain unapplied after a full pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct UnappliedTransformsError {
    entries: Vec<UnresolvedEntry>,
}

impl UnappliedTransformsError {
    /// Wraps the residual catalog entries.
    #[must_use]
    pub const fn new(entries: Vec<UnresolvedEntry>) -> Self {
        Self { entries }
    }

    /// Returns the residual entries.
    #[must_use]
    pub fn entries(&self) -> &[UnresolvedEntry] {
        &self.entries
    }
}

impl fmt::Display for UnappliedTransformsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} class(es) have access transforms that were never applied:",
            self.entries.len()
        )?;
        for entry in &self.entries {
            write!(f, "\n  {entry}")?;
        }
        Ok(())
    }
}
