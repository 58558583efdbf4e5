//! Modifier tokens and the declaration regions they occupy.

use std::ops::Range;

use restamp_at::AccessLevel;

use crate::edit::TextEdit;
use crate::trivia::Trivia;

const FINAL_KEYWORD: &str = "final";

/// Classification of one modifier token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifierKind {
    /// Any keyword other than visibility or `final`, or an annotation that
    /// follows a keyword. Carries the exact source text.
    Fixed(String),
    /// `public`, `protected`, or `private`.
    Visibility(AccessLevel),
    /// The `final` keyword.
    Final,
}

impl ModifierKind {
    /// Classifies a keyword or annotation by its source text.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if text == FINAL_KEYWORD {
            return Self::Final;
        }
        AccessLevel::from_keyword(text).map_or_else(|| Self::Fixed(text.to_owned()), Self::Visibility)
    }

    /// Returns the text printed for this modifier.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Fixed(text) => text,
            Self::Visibility(level) => level.keyword().unwrap_or_default(),
            Self::Final => FINAL_KEYWORD,
        }
    }
}

/// A modifier with its leading trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierToken {
    kind: ModifierKind,
    trivia: Trivia,
}

impl ModifierToken {
    /// Creates a token.
    #[must_use]
    pub const fn new(kind: ModifierKind, trivia: Trivia) -> Self {
        Self { kind, trivia }
    }

    /// Returns the token kind.
    #[must_use]
    pub const fn kind(&self) -> &ModifierKind {
        &self.kind
    }

    /// Returns the leading trivia.
    #[must_use]
    pub const fn trivia(&self) -> &Trivia {
        &self.trivia
    }

    /// Removes and returns the leading trivia, leaving it empty.
    pub fn take_trivia(&mut self) -> Trivia {
        std::mem::take(&mut self.trivia)
    }

    /// Replaces the leading trivia.
    pub fn set_trivia(&mut self, trivia: Trivia) {
        self.trivia = trivia;
    }

    /// Appends trivia then text to `out`.
    pub fn render_into(&self, out: &mut String) {
        self.trivia.render_into(out);
        out.push_str(self.kind.text());
    }
}

/// The rewritable part of a declaration.
///
/// The byte range runs from the end of any leading annotations (or the end
/// of the previous significant token when there are none) to the start of
/// the owner, the element right after the modifiers. Rendering the original
/// tokens and owner trivia reproduces the range's text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierSite {
    range: Range<usize>,
    tokens: Vec<ModifierToken>,
    owner_trivia: Trivia,
}

impl ModifierSite {
    /// Creates a site.
    #[must_use]
    pub const fn new(range: Range<usize>, tokens: Vec<ModifierToken>, owner_trivia: Trivia) -> Self {
        Self {
            range,
            tokens,
            owner_trivia,
        }
    }

    /// Returns the byte range covered by the site.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the modifier tokens in source order.
    #[must_use]
    pub fn tokens(&self) -> &[ModifierToken] {
        &self.tokens
    }

    /// Returns the trivia of the owner element.
    #[must_use]
    pub const fn owner_trivia(&self) -> &Trivia {
        &self.owner_trivia
    }

    /// Renders a token sequence followed by owner trivia.
    #[must_use]
    pub fn render(tokens: &[ModifierToken], owner_trivia: &Trivia) -> String {
        let mut out = String::new();
        for token in tokens {
            token.render_into(&mut out);
        }
        owner_trivia.render_into(&mut out);
        out
    }

    /// Builds the edit replacing this site with a rewritten token sequence.
    #[must_use]
    pub fn edit(&self, tokens: &[ModifierToken], owner_trivia: &Trivia) -> TextEdit {
        TextEdit::new(self.range(), Self::render(tokens, owner_trivia))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("public", ModifierKind::Visibility(AccessLevel::Public))]
    #[case("private", ModifierKind::Visibility(AccessLevel::Private))]
    #[case("final", ModifierKind::Final)]
    #[case("static", ModifierKind::Fixed("static".to_owned()))]
    #[case("@Nullable", ModifierKind::Fixed("@Nullable".to_owned()))]
    fn classifies_modifier_text(#[case] text: &str, #[case] expected: ModifierKind) {
        let kind = ModifierKind::classify(text);
        assert_eq!(kind.text(), text);
        assert_eq!(kind, expected);
    }

    #[test]
    fn render_joins_tokens_and_owner_trivia() {
        let tokens = [
            ModifierToken::new(ModifierKind::Final, Trivia::from_whitespace("\n    ")),
            ModifierToken::new(
                ModifierKind::Visibility(AccessLevel::Protected),
                Trivia::single_space(),
            ),
        ];
        let rendered = ModifierSite::render(&tokens, &Trivia::single_space());
        assert_eq!(rendered, "\n    final protected ");
    }
}
