//! Tree-sitter powered Java source model for the restamp toolchain.
//!
//! This crate turns Java text into the declarations restamp rewrites:
//!
//! - **Parsing** via [`JavaParser`], which tolerates syntax errors and reports
//!   them with one-based positions
//! - **Extraction** via [`CompilationUnit::extract`], producing an arena of
//!   type declarations plus their fields and methods, each with a
//!   [`ModifierSite`] describing the modifier tokens and surrounding
//!   [`Trivia`]
//! - **Attribution** via [`Scope`], [`TypeIndex`] and [`Hierarchy`], which
//!   attribute written type names and superclass links without a compiler
//! - **Editing** via [`TextEdit`] and [`apply_edits`]
//!
//! A modifier site always renders back to the exact text it was captured
//! from, so an untouched declaration never changes a byte.
//!
//! # Example
//!
//! ```
//! use restamp_syntax::{CompilationUnit, JavaParser, ModifierSite};
//!
//! let mut parser = JavaParser::new()?;
//! let parsed = parser.parse("class A {\n    private /* keep */ int x;\n}")?;
//! let unit = CompilationUnit::extract(&parsed);
//!
//! let site = unit.fields()[0].site();
//! let rendered = ModifierSite::render(site.tokens(), site.owner_trivia());
//! assert_eq!(rendered, &parsed.source()[site.range()]);
//! # Ok::<(), restamp_syntax::SyntaxError>(())
//! ```

mod edit;
mod error;
mod extract;
mod modifier;
mod parser;
mod position;
mod semantic;
mod trivia;
mod unit;

pub use edit::{TextEdit, apply_edits};
pub use error::SyntaxError;
pub use modifier::{ModifierKind, ModifierSite, ModifierToken};
pub use parser::{JavaParser, ParseResult, SyntaxErrorInfo};
pub use position::line_of_offset;
pub use semantic::{Hierarchy, Scope, SemanticType, TypeIndex};
pub use trivia::{Comment, Trivia};
pub use unit::{
    CompilationUnit, FieldDeclaration, MethodDeclaration, MethodKind, SkippedDeclaration,
    TypeDeclaration, TypeId, TypeKind, TypeParameter, TypeRef,
};

#[cfg(test)]
mod tests;
