//! Named recursion carriers and the left-recursion resolver.
//!
//! A [`Rule`] is the only expression with identity: its body may reference
//! the rule itself, directly in leftmost position or anywhere else. Naive
//! descent would recurse forever on a leftmost self-reference; the resolver
//! turns that into a finite two-phase evaluation instead:
//!
//! - **Seed**: evaluate the body with same-position re-entry forced to
//!   fail. Whatever matches is the shortest recursion-free parse.
//! - **Grow**: re-evaluate the body with same-position re-entry succeeding
//!   immediately on the previous best (consuming it and replaying its
//!   matches), so the recursive alternative's right-hand side extends the
//!   parse. Iterate while the end position strictly advances.
//!
//! Each grow step must strictly advance, bounded by the input length, so
//! the loop terminates. Indirect left recursion gets no special handling:
//! the inner rule's re-entry meets the outer rule's seed frame only when
//! their offsets coincide, so it fails finitely rather than diverging.

use crate::context::Context;
use crate::error::ErrorRecord;
use crate::expr::{Expr, Pattern};
use crate::span::Pos;
use crate::tree::Match;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Evaluation phase of an active rule invocation.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Phase {
    Seed,
    Grow,
}

/// Pointer identity of a rule, stable for the life of the grammar.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) struct RuleId(usize);

/// One active rule invocation, pushed for the duration of its body
/// evaluation so same-position re-entry can be detected and resolved.
pub(crate) struct LrFrame<I> {
    pub(crate) rule: RuleId,
    pub(crate) start: Pos,
    pub(crate) phase: Phase,
    pub(crate) best_end: Pos,
    pub(crate) best: Vec<Match<I>>,
    /// Seed phase observed a same-position re-entry: the rule is left
    /// recursive here and must grow. Without this, every rule would pay
    /// for a redundant grow iteration — exponentially, once rules nest.
    pub(crate) recursed: bool,
    /// The current grow iteration consumed the previous best.
    pub(crate) reentered: bool,
}

struct RuleData<E, I> {
    name: String,
    body: RefCell<Option<Pattern<E, I>>>,
}

/// A named recursion point wrapping a body expression.
///
/// Rules have stable identity: patterns obtained from [`pat`](Rule::pat)
/// refer to the rule rather than copying its body, which is what lets the
/// resolver recognize re-entry. The reference is weak, so rule graphs
/// (which are naturally cyclic) free themselves once the `Rule` handles are
/// dropped.
pub struct Rule<E, I = ()> {
    data: Rc<RuleData<E, I>>,
}

impl<E, I> Clone for Rule<E, I> {
    fn clone(&self) -> Self {
        Rule {
            data: Rc::clone(&self.data),
        }
    }
}

impl<E: 'static, I: Clone + 'static> Rule<E, I> {
    /// Create a rule with no body yet. The name appears in error records
    /// and trace output.
    pub fn new(name: impl Into<String>) -> Self {
        Rule {
            data: Rc::new(RuleData {
                name: name.into(),
                body: RefCell::new(None),
            }),
        }
    }

    /// Supply (or replace) the body expression.
    pub fn define(&self, body: Pattern<E, I>) {
        *self.data.body.borrow_mut() = Some(body);
    }

    /// A pattern that invokes this rule.
    pub fn pat(&self) -> Pattern<E, I> {
        Pattern::new(RuleRef {
            target: Rc::downgrade(&self.data),
            name: self.data.name.clone(),
        })
    }

    /// The rule's name.
    pub fn name(&self) -> &str {
        &self.data.name
    }
}

struct RuleRef<E, I> {
    target: Weak<RuleData<E, I>>,
    // Kept alongside the weak reference so a dangling invocation can still
    // say which rule it was.
    name: String,
}

impl<E, I: Clone> Expr<E, I> for RuleRef<E, I> {
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let Some(data) = self.target.upgrade() else {
            ctx.record_error(ErrorRecord::undefined_rule(ctx.position(), &self.name));
            debug_assert!(false, "rule `{}` was dropped before its pattern", self.name);
            return false;
        };
        evaluate(&data, ctx)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

fn evaluate<E, I: Clone>(data: &Rc<RuleData<E, I>>, ctx: &mut Context<'_, E, I>) -> bool {
    let id = RuleId(Rc::as_ptr(data) as usize);
    let pos = ctx.position();

    // Same-position re-entry resolves through the innermost active frame
    // for this rule. Re-entry at a different offset is ordinary nested
    // recursion and evaluates freshly below.
    if let Some(index) = ctx.find_frame(id) {
        if ctx.frame(index).start.offset() == pos.offset() {
            return match ctx.frame(index).phase {
                Phase::Seed => {
                    ctx.frame_mut(index).recursed = true;
                    false
                }
                Phase::Grow => {
                    let (best, end) = {
                        let frame = ctx.frame_mut(index);
                        frame.reentered = true;
                        (frame.best.clone(), frame.best_end)
                    };
                    ctx.extend_matches(best);
                    ctx.set_position(end);
                    true
                }
            };
        }
    }

    let body = data.body.borrow().clone();
    let Some(body) = body else {
        ctx.record_error(ErrorRecord::undefined_rule(pos, &data.name));
        debug_assert!(false, "rule `{}` has no body", data.name);
        return false;
    };

    if !ctx.enter_rule() {
        return false;
    }
    let accepted = graft_stack::ensure_headroom(|| resolve(&data.name, &body, ctx, id, pos));
    ctx.leave_rule();
    accepted
}

/// The two-phase evaluation of a rule body at `start`.
fn resolve<E, I: Clone>(
    name: &str,
    body: &Pattern<E, I>,
    ctx: &mut Context<'_, E, I>,
    id: RuleId,
    start: Pos,
) -> bool {
    let mark = ctx.match_mark();
    ctx.push_frame(LrFrame {
        rule: id,
        start,
        phase: Phase::Seed,
        best_end: start,
        best: Vec::new(),
        recursed: false,
        reentered: false,
    });
    let frame_index = ctx.top_frame_index();

    if !body.parse(ctx) {
        ctx.pop_frame();
        return false;
    }

    // No same-position re-entry happened: the rule is not left recursive
    // at this position and the seed result stands as-is.
    if !ctx.frame(frame_index).recursed {
        ctx.pop_frame();
        return true;
    }
    debug!(
        rule = name,
        start = start.offset(),
        end = ctx.position().offset(),
        "seed accepted"
    );

    // Promote the seed to the first best result and start growing. An empty
    // seed still grows: rules with an empty base case extend one step per
    // iteration, and the strict-advance check below bounds the loop.
    {
        let end = ctx.position();
        let best = ctx.matches_since(mark).to_vec();
        let frame = ctx.frame_mut(frame_index);
        frame.phase = Phase::Grow;
        frame.best_end = end;
        frame.best = best;
    }

    loop {
        ctx.truncate_matches(mark);
        ctx.set_position(start);
        ctx.frame_mut(frame_index).reentered = false;

        if !body.parse(ctx) {
            break;
        }
        let end = ctx.position();
        {
            let frame = ctx.frame(frame_index);
            // An iteration that never consulted the previous best can only
            // reproduce the seed; one that did but stopped advancing has
            // reached the fixpoint. Equal-extent alternative structures are
            // discarded either way.
            if !frame.reentered || end.offset() <= frame.best_end.offset() {
                break;
            }
        }
        debug!(rule = name, end = end.offset(), "grow advanced");
        let best = ctx.matches_since(mark).to_vec();
        let frame = ctx.frame_mut(frame_index);
        frame.best_end = end;
        frame.best = best;
    }

    // Commit the best result.
    let Some(frame) = ctx.pop_frame() else {
        return false;
    };
    ctx.truncate_matches(mark);
    ctx.set_position(frame.best_end);
    ctx.extend_matches(frame.best);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{choice, one_or_more, sequence};
    use crate::primitive::{terminal, terminal_range};
    use crate::source::SourceConfig;

    fn ctx(source: &[u8]) -> Context<'_, u8, &'static str> {
        Context::new(source, SourceConfig::ascii())
    }

    fn digits() -> Pattern<u8, &'static str> {
        one_or_more(terminal_range(b'0', b'9'))
    }

    /// `expr := expr '+' num | num` — direct left recursion.
    fn left_recursive_sum() -> Rule<u8, &'static str> {
        let expr = Rule::new("expr");
        expr.define(choice([
            sequence([expr.pat(), terminal(b'+'), digits()]),
            digits(),
        ]));
        expr
    }

    #[test]
    fn non_recursive_rule_behaves_like_its_body() {
        let num = Rule::new("num");
        num.define(digits());
        assert_eq!(num.name(), "num");
        let mut ctx = ctx(b"42;");
        assert!(ctx.parse(&num.pat()));
        assert_eq!(ctx.position().offset(), 2);
    }

    #[test]
    fn left_recursion_consumes_the_whole_chain() {
        let expr = left_recursive_sum();
        let mut ctx = ctx(b"1+2+3");
        assert!(ctx.parse(&expr.pat()));
        assert!(ctx.fully_consumed());
    }

    #[test]
    fn left_recursion_without_suffix_matches_the_seed() {
        let expr = left_recursive_sum();
        let mut ctx = ctx(b"7*");
        assert!(ctx.parse(&expr.pat()));
        assert_eq!(ctx.position().offset(), 1);
    }

    #[test]
    fn left_recursion_fails_when_the_seed_fails() {
        let expr = left_recursive_sum();
        let mut ctx = ctx(b"+1");
        assert!(!ctx.parse(&expr.pat()));
        assert_eq!(ctx.position().offset(), 0);
        assert!(ctx.matches().is_empty());
    }

    #[test]
    fn grow_wraps_matches_left_leaning() {
        let expr = Rule::new("expr");
        expr.define(choice([
            sequence([expr.pat(), terminal(b'+'), digits().flat("num")]).tree("add"),
            digits().flat("num"),
        ]));
        let mut ctx = ctx(b"1+2+3");
        assert!(ctx.parse(&expr.pat()));
        assert_eq!(ctx.matches().len(), 1);

        // ((1+2)+3): outer add spans it all, its first child is the inner add.
        let outer = &ctx.matches()[0];
        assert_eq!(*outer.id(), "add");
        assert_eq!(outer.content(ctx.source()), b"1+2+3");
        assert_eq!(outer.children().len(), 2);
        let inner = &outer.children()[0];
        assert_eq!(*inner.id(), "add");
        assert_eq!(inner.content(ctx.source()), b"1+2");
        assert_eq!(*outer.children()[1].id(), "num");
    }

    #[test]
    fn nested_recursion_at_a_new_offset_is_ordinary() {
        // expr := expr '+' item | item ; item := digit | '(' expr ')'
        let expr = Rule::new("expr");
        let item = Rule::new("item");
        item.define(choice([
            terminal_range(b'0', b'9'),
            sequence([terminal(b'('), expr.pat(), terminal(b')')]),
        ]));
        expr.define(choice([
            sequence([expr.pat(), terminal(b'+'), item.pat()]),
            item.pat(),
        ]));

        let mut ctx = ctx(b"(1+2)+3");
        assert!(ctx.parse(&expr.pat()));
        assert!(ctx.fully_consumed());
    }

    #[test]
    fn indirect_recursion_fails_finitely() {
        // a := b ; b := a — no seed can exist; must fail, not hang.
        let a = Rule::new("a");
        let b = Rule::new("b");
        a.define(b.pat());
        b.define(a.pat());
        let mut ctx = ctx(b"x");
        assert!(!ctx.parse(&a.pat()));
        assert_eq!(ctx.position().offset(), 0);
    }

    #[test]
    fn undefined_rule_records_an_error() {
        // Release behavior: record and fail. (Debug builds assert.)
        if cfg!(debug_assertions) {
            return;
        }
        let rule: Rule<u8, &'static str> = Rule::new("orphan");
        let mut ctx = ctx(b"x");
        assert!(!ctx.parse(&rule.pat()));
        assert_eq!(ctx.errors().len(), 1);
        assert!(ctx.errors()[0].message().contains("orphan"));
    }

    #[test]
    fn depth_limit_fails_rules_cleanly() {
        // item := '(' item ')' | digit — needs one rule entry per paren.
        let item = Rule::new("item");
        item.define(choice([
            sequence([terminal(b'('), item.pat(), terminal(b')')]),
            terminal_range(b'0', b'9'),
        ]));

        let shallow: Context<'_, u8, &'static str> =
            Context::new(b"(1)".as_slice(), SourceConfig::ascii());
        let mut shallow = shallow.with_depth_limit(8);
        assert!(shallow.parse(&item.pat()));

        let deep: Context<'_, u8, &'static str> =
            Context::new(b"(((1)))".as_slice(), SourceConfig::ascii());
        let mut deep = deep.with_depth_limit(2);
        assert!(!deep.parse(&item.pat()));
        assert_eq!(deep.position().offset(), 0);
        assert!(deep
            .errors()
            .iter()
            .any(|record| record.message().contains("depth")));
    }

    #[test]
    fn empty_seed_grows_one_step_at_a_time() {
        // r := r 'x' | ε  — matches any run of x from an empty seed.
        let r = Rule::new("r");
        r.define(choice([
            sequence([r.pat(), terminal(b'x')]),
            sequence([]),
        ]));
        let mut ctx = ctx(b"xxx.");
        assert!(ctx.parse(&r.pat()));
        assert_eq!(ctx.position().offset(), 3);
    }
}
