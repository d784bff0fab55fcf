//! The expression algebra: evaluation contract and shared handles.

use crate::context::Context;
use std::rc::Rc;

/// A parse expression.
///
/// # Contract
///
/// `parse` returns `true` after advancing the context past whatever it
/// consumed (possibly nothing), with zero or more matches appended. On
/// `false` the context position and match list are exactly as before the
/// call: every compound expression saves a [`Snapshot`](crate::Snapshot)
/// before attempting a branch and restores it on local failure. Recorded
/// errors are exempt from rollback.
///
/// Signaling is via the returned bool only; expressions never unwind for
/// control flow.
pub trait Expr<E, I> {
    /// Evaluate this expression at the context's current position.
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool;

    /// Human-readable description, used in error records.
    fn describe(&self) -> String;

    /// The anchor expression, if this is a resynchronization point.
    ///
    /// Sequences use this to locate resume points among their elements
    /// without downcasting.
    fn resume_target(&self) -> Option<&Pattern<E, I>> {
        None
    }

    /// The elements, if this is a sequence.
    ///
    /// Lets [`sequence`](crate::sequence) flatten nested sequences at
    /// construction time.
    fn sequence_children(&self) -> Option<&[Pattern<E, I>]> {
        None
    }

    /// The alternatives, if this is an ordered choice.
    fn choice_children(&self) -> Option<&[Pattern<E, I>]> {
        None
    }
}

/// A reference-counted handle to an immutable expression node.
///
/// Grammars are built once and never mutated; cloning a pattern is cheap
/// and subtrees are shared freely.
pub struct Pattern<E, I = ()> {
    node: Rc<dyn Expr<E, I>>,
}

// Manual impl: `Rc` clones without any bound on `E` or `I`.
impl<E, I> Clone for Pattern<E, I> {
    fn clone(&self) -> Self {
        Pattern {
            node: Rc::clone(&self.node),
        }
    }
}

impl<E, I> Pattern<E, I> {
    pub(crate) fn new(node: impl Expr<E, I> + 'static) -> Self {
        Pattern {
            node: Rc::new(node),
        }
    }

    /// Evaluate this pattern at the context's current position.
    ///
    /// See the [`Expr`] contract for the rollback guarantee.
    pub fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        self.node.parse(ctx)
    }

    /// Human-readable description, used in error records.
    pub fn describe(&self) -> String {
        self.node.describe()
    }

    pub(crate) fn resume_target(&self) -> Option<&Pattern<E, I>> {
        self.node.resume_target()
    }

    pub(crate) fn sequence_children(&self) -> Option<&[Pattern<E, I>]> {
        self.node.sequence_children()
    }

    pub(crate) fn choice_children(&self) -> Option<&[Pattern<E, I>]> {
        self.node.choice_children()
    }
}

impl<E: 'static, I: Clone + 'static> Pattern<E, I> {
    /// This pattern followed by `next`.
    pub fn then(self, next: Pattern<E, I>) -> Pattern<E, I> {
        crate::combinator::sequence([self, next])
    }

    /// This pattern, or `alternative` if it does not match.
    pub fn or(self, alternative: Pattern<E, I>) -> Pattern<E, I> {
        crate::combinator::choice([self, alternative])
    }

    /// Record a childless match with `id` over whatever this consumes.
    pub fn flat(self, id: I) -> Pattern<E, I> {
        crate::capture::match_flat(self, id)
    }

    /// Record a match with `id` adopting the sub-matches this produces.
    pub fn tree(self, id: I) -> Pattern<E, I> {
        crate::capture::match_tree(self, id)
    }
}
