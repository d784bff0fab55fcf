//! A parser combinator engine with direct left recursion.
//!
//! Grammars compose from small expressions — [`terminal`], [`sequence`],
//! [`choice`], repetition, predicates, captures — into an immutable
//! expression tree, which is applied to a borrowed input slice through a
//! [`Context`]. Failed branches roll back through O(1) [`Snapshot`]s.
//! Named [`Rule`]s host recursion, including rules that reference
//! themselves in leftmost position, which classical recursive descent
//! cannot express: a seed-and-grow resolver turns left recursion into a
//! finite iteration. Sequences can carry resynchronization anchors
//! ([`error_resume`]) so a parse records an error and keeps going instead
//! of giving up at the first problem.
//!
//! Parsing is pure backtracking with no memoization; the exponential worst
//! case is accepted. Evaluation is single-threaded and fully recursive —
//! run concurrent parses by giving each its own [`Context`].
//!
//! # Example
//!
//! ```
//! use graft::{choice, one_or_more, sequence, terminal, text, Context, Rule, SourceConfig};
//!
//! // add := add '+' num | num ; num := digit+
//! let num = Rule::new("num");
//! num.define(one_or_more(text::digit()).flat("num"));
//! let add = Rule::new("add");
//! add.define(choice([
//!     sequence([add.pat(), terminal(b'+'), num.pat()]).tree("add"),
//!     num.pat(),
//! ]));
//!
//! let mut ctx = Context::new(b"1+2+3".as_slice(), SourceConfig::ascii());
//! assert!(ctx.parse(&add.pat()));
//! assert!(ctx.fully_consumed());
//!
//! // Left-leaning: ((1+2)+3)
//! let root = &ctx.matches()[0];
//! assert_eq!(*root.id(), "add");
//! assert_eq!(root.content(ctx.source()), b"1+2+3");
//! ```
//!
//! # Stack usage
//!
//! Recursion depth is bounded by grammar depth times input length for
//! pathological grammars. Rule entries grow the native stack on demand
//! (via `graft_stack`), and [`Context::with_depth_limit`] turns runaway
//! depth into a recorded error instead of exhausting memory.

mod capture;
mod combinator;
mod context;
mod error;
mod expr;
mod primitive;
mod recovery;
mod rule;
mod source;
mod span;
pub mod text;
mod tree;

#[cfg(test)]
mod tests;

pub use capture::{match_flat, match_tree};
pub use combinator::{
    and_pred, choice, difference, not_pred, one_or_more, optional, sequence, zero_or_more,
};
pub use context::{Context, Snapshot};
pub use error::ErrorRecord;
pub use expr::{Expr, Pattern};
pub use primitive::{any, terminal, terminal_range, terminal_set, terminal_string};
pub use recovery::error_resume;
pub use rule::Rule;
pub use source::SourceConfig;
pub use span::{Pos, Span};
pub use tree::Match;

/// Parse `input` from the start under exact element comparison.
///
/// Convenience for the common case; returns whether the root matched along
/// with the finished context, whose [`matches`](Context::matches),
/// [`errors`](Context::errors) and [`position`](Context::position) hold the
/// outcome. Note that a match need not have consumed the whole input —
/// check [`Context::fully_consumed`].
pub fn parse<'s, E: Ord, I>(input: &'s [E], root: &Pattern<E, I>) -> (bool, Context<'s, E, I>) {
    let mut ctx = Context::new(input, SourceConfig::exact());
    let matched = ctx.parse(root);
    (matched, ctx)
}
