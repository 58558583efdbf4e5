//! Tree-sitter Java parser wrapper with error recovery.
//!
//! Tree-sitter is error-tolerant: a parse result always carries a tree, and
//! regions it could not make sense of become ERROR or MISSING nodes. Callers
//! decide whether such a tree is still worth rewriting.

use std::ops::Range;

use crate::error::SyntaxError;
use crate::position::point_to_one_based;

/// Result of parsing one Java compilation unit.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
}

impl ParseResult {
    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the root `program` node.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the tree contains ERROR or MISSING nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects every syntax error in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let (line, column) = point_to_one_based(node.start_position());
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            let snippet: String = source
                .get(node.byte_range())
                .unwrap_or_default()
                .chars()
                .take(40)
                .collect();
            format!("unexpected `{}`", snippet.trim())
        };
        Self {
            byte_range: node.byte_range(),
            line,
            column,
            message,
        }
    }
}

/// Java parser backed by `tree-sitter-java`.
///
/// Parsers are not thread-safe; give each worker its own instance.
pub struct JavaParser {
    inner: tree_sitter::Parser,
}

impl JavaParser {
    /// Creates a parser configured for Java.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar is incompatible with the linked
    /// Tree-sitter runtime.
    pub fn new() -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| SyntaxError::parser_init(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parses Java source text.
    ///
    /// # Errors
    ///
    /// Returns an error if Tree-sitter produces no tree at all, which only
    /// happens when the parser is misconfigured.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse("parser returned no tree"))?;
        Ok(ParseResult {
            tree,
            source: source.to_owned(),
        })
    }
}

fn collect_error_nodes(
    node: tree_sitter::Node<'_>,
    source: &str,
    errors: &mut Vec<SyntaxErrorInfo>,
) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node, source));
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("class A {}", false)]
    #[case("public class A { private int x; }", false)]
    #[case("class A { void m( }", true)]
    #[case("class {", true)]
    fn parser_detects_errors(#[case] source: &str, #[case] has_errors: bool) {
        let mut parser = JavaParser::new().expect("parser init");
        let result = parser.parse(source).expect("parse");
        assert_eq!(result.has_errors(), has_errors);
        assert_eq!(result.errors().is_empty(), !has_errors);
    }

    #[test]
    fn syntax_errors_carry_one_based_positions() {
        let mut parser = JavaParser::new().expect("parser init");
        let result = parser.parse("class A {\n  int x = ;\n}").expect("parse");

        let errors = result.errors();
        let first = errors.first().expect("has error");
        assert_eq!(first.line, 2);
        assert!(first.column >= 1);
    }
}
