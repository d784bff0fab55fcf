//! The match tree.

use crate::span::{Pos, Span};

/// A recorded production: a host-chosen identifier, the source extent it
/// covers, and the sub-matches recorded while it was being parsed.
///
/// Invariants upheld by the engine:
///
/// - `begin() <= end()`
/// - children are fully contained in `[begin, end)`, ordered by start
/// - siblings never overlap
///
/// A match references the input by position only; use [`content`](Match::content)
/// with the original input to get the covered slice.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Match<I> {
    id: I,
    begin: Pos,
    end: Pos,
    children: Vec<Match<I>>,
}

impl<I> Match<I> {
    /// A match with no recorded sub-matches.
    pub(crate) fn leaf(id: I, begin: Pos, end: Pos) -> Self {
        Match {
            id,
            begin,
            end,
            children: Vec::new(),
        }
    }

    /// A match wrapping previously recorded sub-matches.
    pub(crate) fn with_children(id: I, begin: Pos, end: Pos, children: Vec<Match<I>>) -> Self {
        Match {
            id,
            begin,
            end,
            children,
        }
    }

    /// The host-chosen identifier.
    pub fn id(&self) -> &I {
        &self.id
    }

    /// Position of the first covered element.
    pub fn begin(&self) -> Pos {
        self.begin
    }

    /// Position one past the last covered element.
    pub fn end(&self) -> Pos {
        self.end
    }

    /// The covered extent as a [`Span`].
    pub fn span(&self) -> Span {
        self.begin.span_to(self.end)
    }

    /// Sub-matches, in source order.
    pub fn children(&self) -> &[Match<I>] {
        &self.children
    }

    /// The input slice this match covers.
    ///
    /// `source` must be the sequence the match was parsed from.
    pub fn content<'s, E>(&self, source: &'s [E]) -> &'s [E] {
        &source[self.begin.offset()..self.end.offset()]
    }

    /// Depth-first walk, parents before children.
    pub fn walk(&self, visit: &mut impl FnMut(&Match<I>)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
