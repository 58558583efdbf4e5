//! Leading whitespace and comments attached to a token.
//!
//! A [`Trivia`] value holds the whitespace before its first comment plus an
//! ordered list of comments, each carrying the whitespace that follows it.
//! Rendering concatenates the parts, so parsing and rendering gap text is
//! lossless.

use std::fmt;

use crate::error::SyntaxError;

/// A single comment and the whitespace after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    text: String,
    suffix: String,
}

impl Comment {
    /// Creates a comment from its text (including delimiters) and suffix.
    #[must_use]
    pub fn new(text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suffix: suffix.into(),
        }
    }

    /// Returns the comment text, delimiters included.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the whitespace following the comment.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

/// Whitespace and comments preceding a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    whitespace: String,
    comments: Vec<Comment>,
}

impl Trivia {
    /// Creates trivia from leading whitespace and comments.
    #[must_use]
    pub fn new(whitespace: impl Into<String>, comments: Vec<Comment>) -> Self {
        Self {
            whitespace: whitespace.into(),
            comments,
        }
    }

    /// Creates comment-free trivia.
    #[must_use]
    pub fn from_whitespace(whitespace: impl Into<String>) -> Self {
        Self::new(whitespace, Vec::new())
    }

    /// The canonical separator between adjacent modifiers.
    #[must_use]
    pub fn single_space() -> Self {
        Self::from_whitespace(" ")
    }

    /// Splits gap text into whitespace and comments.
    ///
    /// `offset` is the byte position of `text` within its source file and
    /// only feeds error messages.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::TriviaError`] when the text holds anything other
    /// than whitespace, `//` comments, and `/* */` comments.
    pub fn parse(text: &str, offset: usize) -> Result<Self, SyntaxError> {
        let (whitespace, mut rest) = split_leading_whitespace(text);
        let mut comments = Vec::new();
        while !rest.is_empty() {
            let (comment, after) = if rest.starts_with("//") {
                rest.find('\n').map_or((rest, ""), |end| rest.split_at(end))
            } else if let Some(body) = rest.strip_prefix("/*") {
                let end = body
                    .find("*/")
                    .ok_or_else(|| SyntaxError::trivia(offset, "unterminated block comment"))?;
                rest.split_at(end.saturating_add(4))
            } else {
                let snippet: String = rest.chars().take(20).collect();
                return Err(SyntaxError::trivia(
                    offset,
                    format!("expected whitespace or a comment, found `{snippet}`"),
                ));
            };
            let (suffix, remaining) = split_leading_whitespace(after);
            comments.push(Comment::new(comment, suffix));
            rest = remaining;
        }
        Ok(Self::new(whitespace, comments))
    }

    /// Returns the whitespace before the first comment.
    #[must_use]
    pub fn whitespace(&self) -> &str {
        &self.whitespace
    }

    /// Returns the comments in order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns true when there is neither whitespace nor a comment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty() && self.comments.is_empty()
    }

    /// Appends the rendered trivia to `out`.
    pub fn render_into(&self, out: &mut String) {
        out.push_str(&self.whitespace);
        for comment in &self.comments {
            out.push_str(&comment.text);
            out.push_str(&comment.suffix);
        }
    }

    /// Additive merge.
    ///
    /// An empty side yields the other. Otherwise comments are concatenated in
    /// order and the whitespace of the side with more line breaks wins,
    /// tie-broken by the longer text after the last line break; full ties
    /// keep `self`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let Self {
            whitespace: left,
            mut comments,
        } = self;
        let Self {
            whitespace: right,
            comments: appended,
        } = other;
        comments.extend(appended);
        let whitespace = if whitespace_weight(&left) >= whitespace_weight(&right) {
            left
        } else {
            right
        };
        Self::new(whitespace, comments)
    }

    /// Adopts `other` wholesale when `self` is empty; otherwise keeps this
    /// whitespace and appends `other`'s comments.
    #[must_use]
    pub fn fill_if_empty(mut self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        self.comments.extend(other.comments);
        self
    }
}

impl fmt::Display for Trivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = String::new();
        self.render_into(&mut rendered);
        f.write_str(&rendered)
    }
}

/// Orders whitespace by line breaks, then by the length of the last line.
fn whitespace_weight(whitespace: &str) -> (usize, usize) {
    let breaks = whitespace.matches('\n').count();
    let tail = whitespace
        .len()
        .saturating_sub(whitespace.rfind('\n').unwrap_or(0));
    (breaks, tail)
}

fn split_leading_whitespace(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(text.len());
    text.split_at(end)
}
