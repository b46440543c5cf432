//! Span - token-index ranges used to locate AST nodes without owning tokens.
//!
//! Unlike a byte-offset span over raw source text, a `Span` here addresses a
//! half-open range of *token indices* in a `TranslationUnit`'s token array.
//! AST nodes never store byte offsets or pointers into source text directly;
//! they store token indices, and token-to-text mapping is TranslationUnit's
//! job (`cpplang-tu`).

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range of token indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[must_use]
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[must_use]
    #[inline]
    pub const fn at(token: u32) -> Self {
        Span {
            start: token,
            end: token + 1,
        }
    }

    /// A span with no tokens, used before a subtree has started parsing.
    #[must_use]
    #[inline]
    pub const fn empty() -> Self {
        Span { start: 0, end: 0 }
    }

    #[must_use]
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    #[inline]
    pub const fn merge(&self, other: Span) -> Span {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Types that can report the token-index span they cover.
///
/// `first_token() == span().start` and `last_token() == span().end - 1`,
/// matching the ordering invariant every AST node must satisfy.
pub trait Spanned {
    fn span(&self) -> Span;

    #[must_use]
    fn first_token(&self) -> u32 {
        self.span().start
    }

    #[must_use]
    fn last_token(&self) -> u32 {
        self.span().end.saturating_sub(1)
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

/// Helper for building a span while a recursive-descent parser consumes
/// tokens: remember the starting token index, then close it off once the
/// production is done.
#[derive(Clone, Copy, Debug)]
pub struct SpanBuilder {
    start: u32,
}

impl SpanBuilder {
    #[must_use]
    #[inline]
    pub const fn start(token: u32) -> Self {
        SpanBuilder { start: token }
    }

    #[must_use]
    #[inline]
    pub const fn end(&self, token: u32) -> Span {
        Span::new(self.start, token)
    }

    #[must_use]
    #[inline]
    pub const fn start_token(&self) -> u32 {
        self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both_spans() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        assert_eq!(a.merge(b), Span::new(2, 9));
    }

    #[test]
    fn first_and_last_token_bracket_the_span() {
        let s = Span::new(3, 7);
        assert_eq!(s.first_token(), 3);
        assert_eq!(s.last_token(), 6);
    }

    #[test]
    fn builder_closes_span_at_given_token() {
        let b = SpanBuilder::start(10);
        assert_eq!(b.end(15), Span::new(10, 15));
    }
}
