//! Match-recording expressions.
//!
//! Nothing else in the algebra records matches; a grammar with no captures
//! is a pure recognizer. The two capture shapes differ only in what happens
//! to the matches the wrapped expression produced itself: `match_flat`
//! discards them, `match_tree` adopts them as children.

use crate::context::Context;
use crate::expr::{Expr, Pattern};
use crate::tree::Match;

struct FlatCapture<E, I> {
    inner: Pattern<E, I>,
    id: I,
}

impl<E, I: Clone> Expr<E, I> for FlatCapture<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let begin = ctx.position();
        let mark = ctx.match_mark();
        if !self.inner.parse(ctx) {
            return false;
        }
        ctx.truncate_matches(mark);
        ctx.push_match(Match::leaf(self.id.clone(), begin, ctx.position()));
        true
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

/// Record a childless match with `id` spanning whatever `inner` consumes.
///
/// Matches `inner` produced internally are dropped from the committed list.
pub fn match_flat<E, I>(inner: Pattern<E, I>, id: I) -> Pattern<E, I>
where
    E: 'static,
    I: Clone + 'static,
{
    Pattern::new(FlatCapture { inner, id })
}

struct TreeCapture<E, I> {
    inner: Pattern<E, I>,
    id: I,
}

impl<E, I: Clone> Expr<E, I> for TreeCapture<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let begin = ctx.position();
        let mark = ctx.match_mark();
        if !self.inner.parse(ctx) {
            return false;
        }
        let children = ctx.drain_matches(mark);
        ctx.push_match(Match::with_children(
            self.id.clone(),
            begin,
            ctx.position(),
            children,
        ));
        true
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

/// Record a match with `id` spanning whatever `inner` consumes, adopting
/// the matches `inner` produced as its children.
///
/// Children arrive in source order because the committed list is in source
/// order and everything since entry belongs to `inner`.
pub fn match_tree<E, I>(inner: Pattern<E, I>, id: I) -> Pattern<E, I>
where
    E: 'static,
    I: Clone + 'static,
{
    Pattern::new(TreeCapture { inner, id })
}
