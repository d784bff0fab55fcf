//! Compound parse expressions.
//!
//! Every combinator here upholds the rollback contract of [`Expr`]: a
//! failed attempt leaves the context bit-identical to the pre-call
//! snapshot. Children guarantee the same recursively, which the compound
//! implementations re-check with `debug_assert`s rather than paying for
//! defensive restores on the hot path.

use crate::context::Context;
use crate::error::ErrorRecord;
use crate::expr::{Expr, Pattern};
use crate::recovery;
use smallvec::SmallVec;

pub(crate) struct Sequence<E, I> {
    elements: SmallVec<[Pattern<E, I>; 4]>,
}

impl<E, I> Expr<E, I> for Sequence<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let snap = ctx.snapshot();
        let mut index = 0;
        while index < self.elements.len() {
            let element = &self.elements[index];
            let before = ctx.snapshot();
            if element.parse(ctx) {
                index += 1;
                continue;
            }
            debug_assert_eq!(ctx.snapshot(), before, "failed element must restore state");
            // A later resume point turns the failure into a recorded error
            // and a resynchronization — but only once the sequence has
            // consumed something. A failure with no progress means the
            // sequence never started; resynchronizing there would record a
            // phantom error on every empty tail (e.g. a resumable item
            // inside a repetition probing at end of input).
            let committed = ctx.position().offset() > snap.pos().offset();
            let resume = if committed {
                self.elements[index + 1..]
                    .iter()
                    .position(|later| later.resume_target().is_some())
            } else {
                None
            };
            let Some(found) = resume else {
                ctx.restore(snap);
                return false;
            };
            let resume_index = index + 1 + found;
            ctx.record_error(ErrorRecord::expected(ctx.position(), &element.describe()));
            if let Some(anchor) = self.elements[resume_index].resume_target() {
                recovery::resynchronize(ctx, anchor);
            }
            index = resume_index + 1;
        }
        true
    }

    fn describe(&self) -> String {
        self.elements
            .first()
            .map_or_else(|| "nothing".to_string(), Pattern::describe)
    }

    fn sequence_children(&self) -> Option<&[Pattern<E, I>]> {
        Some(&self.elements)
    }
}

/// Accept every element in order; all or nothing.
///
/// Nested sequences are flattened at construction. An empty sequence
/// succeeds without consuming anything.
pub fn sequence<E, I>(elements: impl IntoIterator<Item = Pattern<E, I>>) -> Pattern<E, I>
where
    E: 'static,
    I: 'static,
{
    let mut flat: SmallVec<[Pattern<E, I>; 4]> = SmallVec::new();
    for element in elements {
        if let Some(nested) = element.sequence_children() {
            flat.extend(nested.iter().cloned());
        } else {
            flat.push(element);
        }
    }
    Pattern::new(Sequence { elements: flat })
}

struct Choice<E, I> {
    alternatives: SmallVec<[Pattern<E, I>; 4]>,
}

impl<E, I> Expr<E, I> for Choice<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let snap = ctx.snapshot();
        for alternative in &self.alternatives {
            if alternative.parse(ctx) {
                return true;
            }
            debug_assert_eq!(
                ctx.snapshot(),
                snap,
                "failed alternative must restore state"
            );
        }
        false
    }

    fn describe(&self) -> String {
        let described: Vec<String> = self.alternatives.iter().map(Pattern::describe).collect();
        described.join(" or ")
    }

    fn choice_children(&self) -> Option<&[Pattern<E, I>]> {
        Some(&self.alternatives)
    }
}

/// Try each alternative in declaration order and commit to the first that
/// matches; later alternatives are never consulted after a success.
///
/// Nested choices are flattened at construction. An empty choice fails.
pub fn choice<E, I>(alternatives: impl IntoIterator<Item = Pattern<E, I>>) -> Pattern<E, I>
where
    E: 'static,
    I: 'static,
{
    let mut flat: SmallVec<[Pattern<E, I>; 4]> = SmallVec::new();
    for alternative in alternatives {
        if let Some(nested) = alternative.choice_children() {
            flat.extend(nested.iter().cloned());
        } else {
            flat.push(alternative);
        }
    }
    Pattern::new(Choice { alternatives: flat })
}

struct Repeat<E, I> {
    inner: Pattern<E, I>,
    at_least_one: bool,
}

impl<E, I> Expr<E, I> for Repeat<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let mut count = 0usize;
        loop {
            let before = ctx.position();
            if !self.inner.parse(ctx) {
                break;
            }
            count += 1;
            // Fixpoint: a success that consumed nothing would repeat
            // forever. Keep its effects and stop.
            if ctx.position().offset() == before.offset() {
                break;
            }
        }
        !self.at_least_one || count > 0
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

/// Apply `inner` until it stops matching; always succeeds.
pub fn zero_or_more<E: 'static, I: 'static>(inner: Pattern<E, I>) -> Pattern<E, I> {
    Pattern::new(Repeat {
        inner,
        at_least_one: false,
    })
}

/// Apply `inner` until it stops matching; fails if it never matched.
pub fn one_or_more<E: 'static, I: 'static>(inner: Pattern<E, I>) -> Pattern<E, I> {
    Pattern::new(Repeat {
        inner,
        at_least_one: true,
    })
}

struct Optional<E, I> {
    inner: Pattern<E, I>,
}

impl<E, I> Expr<E, I> for Optional<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let snap = ctx.snapshot();
        if !self.inner.parse(ctx) {
            ctx.restore(snap);
        }
        true
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

/// Apply `inner` if it matches; succeed either way.
pub fn optional<E: 'static, I: 'static>(inner: Pattern<E, I>) -> Pattern<E, I> {
    Pattern::new(Optional { inner })
}

struct Predicate<E, I> {
    inner: Pattern<E, I>,
    expect_match: bool,
}

impl<E, I> Expr<E, I> for Predicate<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let snap = ctx.snapshot();
        let matched = self.inner.parse(ctx);
        ctx.restore(snap);
        matched == self.expect_match
    }

    fn describe(&self) -> String {
        if self.expect_match {
            self.inner.describe()
        } else {
            format!("anything but {}", self.inner.describe())
        }
    }
}

/// Succeed iff `inner` would match here. Consumes nothing, records nothing.
pub fn and_pred<E: 'static, I: 'static>(inner: Pattern<E, I>) -> Pattern<E, I> {
    Pattern::new(Predicate {
        inner,
        expect_match: true,
    })
}

/// Succeed iff `inner` would not match here. Consumes nothing, records
/// nothing.
pub fn not_pred<E: 'static, I: 'static>(inner: Pattern<E, I>) -> Pattern<E, I> {
    Pattern::new(Predicate {
        inner,
        expect_match: false,
    })
}

struct Difference<E, I> {
    keep: Pattern<E, I>,
    subtract: Pattern<E, I>,
}

impl<E, I> Expr<E, I> for Difference<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let snap = ctx.snapshot();
        if self.subtract.parse(ctx) {
            ctx.restore(snap);
            return false;
        }
        debug_assert_eq!(ctx.snapshot(), snap);
        self.keep.parse(ctx)
    }

    fn describe(&self) -> String {
        self.keep.describe()
    }
}

/// Accept what `keep` accepts, except where `subtract` also matches at the
/// same position. Consumes what `keep` consumes.
pub fn difference<E: 'static, I: 'static>(
    keep: Pattern<E, I>,
    subtract: Pattern<E, I>,
) -> Pattern<E, I> {
    Pattern::new(Difference { keep, subtract })
}
