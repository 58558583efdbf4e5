//! Access-transform application for Java sources.
//!
//! This crate connects the transform catalog from `restamp-at` to the source
//! model from `restamp-syntax`:
//!
//! - [`ModifierRewriter`] splices a modifier list into the requested shape
//!   with the smallest textual change, relocating comments and whitespace of
//!   dropped modifiers instead of losing them
//! - [`SignatureResolver`] erases attributed member types into descriptors
//! - [`Orchestrator`] visits every declaration of a compilation unit,
//!   consulting the catalog and the superclass chain for overriding methods
//! - [`Restamp`] selects, loads, and processes a whole source set in
//!   parallel and returns a [`RunReport`]
//!
//! # Example
//!
//! ```no_run
//! use restamp_at::{TransformCatalog, read_transformers};
//! use restamp_core::{Restamp, SourceSelection};
//!
//! let transforms = read_transformers("build/restamp.at".as_ref())?;
//! let files = SourceSelection::new("src/main/java")
//!     .from_transformers(true)
//!     .resolve(&transforms)?;
//!
//! let restamp = Restamp::new();
//! let sources = restamp.load(&files)?;
//! let report = restamp.run(&sources, &TransformCatalog::new(transforms))?;
//! report.write_all()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod orchestrator;
mod resolver;
mod rewriter;
mod run;
mod source;

pub use error::{ResolutionError, RunError};
pub use orchestrator::{AppliedTransform, MemberFailure, Orchestrator, UnitOutcome};
pub use resolver::SignatureResolver;
pub use rewriter::{ModifierRewriter, Rewrite};
pub use run::{FileRewrite, Hunk, Restamp, RunReport};
pub use source::{SourceFile, SourceSelection, SourceSet};

#[cfg(test)]
mod tests;
