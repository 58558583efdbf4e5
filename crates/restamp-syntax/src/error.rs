//! Error types for Java syntax operations.
//!
//! This module provides structured error types for parsing, trivia capture,
//! declaration extraction, and text editing in the `restamp-syntax` crate.

use thiserror::Error;

/// Errors from syntactic operations on Java sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser.
    #[error("failed to initialise Java parser: {message}")]
    ParserInitError {
        /// Description of the failure.
        message: String,
    },

    /// Failed to parse source code.
    #[error("failed to parse Java source: {message}")]
    ParseError {
        /// Description of the failure.
        message: String,
    },

    /// Text between two tokens was expected to hold only whitespace and
    /// comments.
    #[error("unexpected text in trivia at byte {offset}: {message}")]
    TriviaError {
        /// Byte offset where the trivia starts.
        offset: usize,
        /// Description of the failure.
        message: String,
    },

    /// A declaration lacked a node that every well-formed declaration has.
    #[error("malformed {kind} at line {line}: {message}")]
    MalformedDeclaration {
        /// Tree-sitter kind of the declaration.
        kind: String,
        /// One-based line of the declaration.
        line: u32,
        /// Description of the failure.
        message: String,
    },

    /// A text edit could not be applied.
    #[error("edit failed: {message}")]
    EditError {
        /// Description of the failure.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(message: impl Into<String>) -> Self {
        Self::ParserInitError {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Creates a trivia error.
    #[must_use]
    pub fn trivia(offset: usize, message: impl Into<String>) -> Self {
        Self::TriviaError {
            offset,
            message: message.into(),
        }
    }

    /// Creates a malformed declaration error.
    #[must_use]
    pub fn malformed(kind: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            kind: kind.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates an edit error.
    #[must_use]
    pub fn edit(message: impl Into<String>) -> Self {
        Self::EditError {
            message: message.into(),
        }
    }
}
