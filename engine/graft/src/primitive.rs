//! Parse expressions that accept specific input elements.

use crate::context::Context;
use crate::expr::{Expr, Pattern};
use smallvec::SmallVec;
use std::fmt;

struct Terminal<E> {
    value: E,
}

impl<E: Clone + fmt::Debug, I> Expr<E, I> for Terminal<E> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        match ctx.peek() {
            Some(element) if ctx.elements_equal(element, &self.value) => {
                ctx.advance();
                true
            }
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("{:?}", self.value)
    }
}

/// Accept a single element equal to `value`.
pub fn terminal<E, I>(value: E) -> Pattern<E, I>
where
    E: Clone + fmt::Debug + 'static,
    I: 'static,
{
    Pattern::new(Terminal { value })
}

struct TerminalString<E> {
    literal: SmallVec<[E; 8]>,
}

impl<E: Clone + fmt::Debug, I> Expr<E, I> for TerminalString<E> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let snap = ctx.snapshot();
        for expected in &self.literal {
            match ctx.peek() {
                Some(element) if ctx.elements_equal(element, expected) => {
                    ctx.advance();
                }
                _ => {
                    ctx.restore(snap);
                    return false;
                }
            }
        }
        true
    }

    fn describe(&self) -> String {
        format!("{:?}", self.literal.as_slice())
    }
}

/// Accept the elements of `literal` in order, all or nothing.
///
/// An empty literal succeeds without consuming anything.
pub fn terminal_string<E, I>(literal: &[E]) -> Pattern<E, I>
where
    E: Clone + fmt::Debug + 'static,
    I: 'static,
{
    Pattern::new(TerminalString {
        literal: literal.iter().cloned().collect(),
    })
}

struct TerminalRange<E> {
    lo: E,
    hi: E,
}

impl<E: Clone + fmt::Debug, I> Expr<E, I> for TerminalRange<E> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        match ctx.peek() {
            Some(element)
                if !ctx.compare(element, &self.lo).is_lt()
                    && !ctx.compare(element, &self.hi).is_gt() =>
            {
                ctx.advance();
                true
            }
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("{:?}..={:?}", self.lo, self.hi)
    }
}

/// Accept a single element in the inclusive range `lo..=hi` under the
/// context's element ordering.
pub fn terminal_range<E, I>(lo: E, hi: E) -> Pattern<E, I>
where
    E: Clone + fmt::Debug + 'static,
    I: 'static,
{
    Pattern::new(TerminalRange { lo, hi })
}

struct TerminalSet<E> {
    alternatives: SmallVec<[E; 8]>,
}

impl<E: Clone + fmt::Debug, I> Expr<E, I> for TerminalSet<E> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        match ctx.peek() {
            Some(element)
                if self
                    .alternatives
                    .iter()
                    .any(|candidate| ctx.elements_equal(element, candidate)) =>
            {
                ctx.advance();
                true
            }
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("one of {:?}", self.alternatives.as_slice())
    }
}

/// Accept a single element equal to any of `alternatives`.
pub fn terminal_set<E, I>(alternatives: &[E]) -> Pattern<E, I>
where
    E: Clone + fmt::Debug + 'static,
    I: 'static,
{
    Pattern::new(TerminalSet {
        alternatives: alternatives.iter().cloned().collect(),
    })
}

struct Any;

impl<E, I> Expr<E, I> for Any {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        ctx.advance().is_some()
    }

    fn describe(&self) -> String {
        "any element".to_string()
    }
}

/// Accept any single element; fails only at end of input.
pub fn any<E: 'static, I: 'static>() -> Pattern<E, I> {
    Pattern::new(Any)
}
