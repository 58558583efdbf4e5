//! Byte-range text edits.

use std::ops::Range;

use crate::error::SyntaxError;

/// Replacement of one byte range of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    range: Range<usize>,
    replacement: String,
}

impl TextEdit {
    /// Creates an edit.
    #[must_use]
    pub const fn new(range: Range<usize>, replacement: String) -> Self {
        Self { range, replacement }
    }

    /// Returns the replaced byte range in the original text.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the replacement text.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Applies non-overlapping edits to `source`.
///
/// Edits are applied from the end of the file towards the start so earlier
/// offsets stay valid.
///
/// # Errors
///
/// Returns [`SyntaxError::EditError`] when a range lies outside the source,
/// splits a UTF-8 sequence, or overlaps another edit.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String, SyntaxError> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut result = source.to_owned();
    let mut limit = source.len();
    for edit in ordered {
        let range = edit.range();
        if range.start > range.end || range.end > limit {
            return Err(SyntaxError::edit(format!(
                "edit range {}..{} is out of bounds or overlaps a later edit",
                range.start, range.end
            )));
        }
        if !result.is_char_boundary(range.start) || !result.is_char_boundary(range.end) {
            return Err(SyntaxError::edit(
                "edit range is not on a UTF-8 boundary",
            ));
        }
        limit = range.start;
        result.replace_range(range, &edit.replacement);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_edits_regardless_of_input_order() {
        let edits = [
            TextEdit::new(0..7, "public".to_owned()),
            TextEdit::new(14..14, "final ".to_owned()),
        ];
        let result = apply_edits("private class A {}", &edits).expect("apply");
        assert_eq!(result, "public class final A {}");
    }

    #[test]
    fn rejects_overlapping_edits() {
        let edits = [
            TextEdit::new(0..5, String::new()),
            TextEdit::new(3..8, String::new()),
        ];
        assert!(apply_edits("0123456789", &edits).is_err());
    }

    #[test]
    fn rejects_ranges_inside_multibyte_characters() {
        let edits = [TextEdit::new(1..2, String::new())];
        assert!(apply_edits("é", &edits).is_err());
    }
}
