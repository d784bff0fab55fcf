//! Property tests for the engine invariants.

use crate::{
    choice, one_or_more, optional, sequence, terminal, terminal_range, terminal_string,
    zero_or_more, Context, Pattern, Rule, SourceConfig,
};
use proptest::prelude::*;

fn byte_context(source: &[u8]) -> Context<'_, u8, &'static str> {
    Context::new(source, SourceConfig::ascii())
}

/// `expr := expr '+' num | expr '*' num | expr '-' num | num`, with
/// captures, so repeated parses produce comparable trees.
fn summed() -> Rule<u8, &'static str> {
    let expr = Rule::new("expr");
    let num = one_or_more(terminal_range(b'0', b'9')).flat("num");
    let tail = |op: u8| sequence([expr.pat(), terminal(op), num.clone()]).tree("expr");
    expr.define(choice([tail(b'+'), tail(b'*'), tail(b'-'), num.clone()]));
    expr
}

proptest! {
    /// Rollback purity: a failed parse leaves `(pos, matches)` bit-identical
    /// to the pre-call snapshot, whatever the input.
    #[test]
    fn failed_parses_restore_state_exactly(input in proptest::collection::vec(any::<u8>(), 0..48)) {
        let pattern: Pattern<u8, &'static str> = sequence([
            one_or_more(terminal_range(b'0', b'9')).flat("digits"),
            terminal(b'!'),
        ]);
        let mut ctx = byte_context(&input);
        let before = ctx.snapshot();
        if !ctx.parse(&pattern) {
            prop_assert_eq!(ctx.snapshot(), before);
            prop_assert!(ctx.matches().is_empty());
        }
    }

    /// Ordered-choice determinism: the composite result equals the first
    /// alternative's result when it succeeds, the second's otherwise.
    #[test]
    fn choice_equals_first_successful_alternative(input in "[ab]{0,6}") {
        let first: Pattern<u8, &'static str> = terminal_string(b"ab");
        let second: Pattern<u8, &'static str> = terminal_string(b"a");
        let composite = choice([first.clone(), second.clone()]);
        let bytes = input.as_bytes();

        let mut lone = byte_context(bytes);
        let expected = if first.parse(&mut lone) {
            Some(lone.position().offset())
        } else {
            let mut fallback = byte_context(bytes);
            second.parse(&mut fallback).then(|| fallback.position().offset())
        };

        let mut ctx = byte_context(bytes);
        let outcome = composite.parse(&mut ctx).then(|| ctx.position().offset());
        prop_assert_eq!(outcome, expected);
    }

    /// No-advance termination: repetition over a nullable body terminates
    /// and still consumes exactly the matching prefix.
    #[test]
    fn repetition_consumes_exactly_the_digit_prefix(input in "[0-9]{0,8}[a-z]{0,8}") {
        let pattern: Pattern<u8, &'static str> =
            zero_or_more(optional(terminal_range(b'0', b'9')));
        let bytes = input.as_bytes();
        let mut ctx = byte_context(bytes);
        prop_assert!(ctx.parse(&pattern));
        let prefix = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        prop_assert_eq!(ctx.position().offset(), prefix);
    }

    /// Idempotence: the same grammar over the same input twice produces the
    /// same outcome, position, and match tree.
    #[test]
    fn repeated_parses_are_identical(input in "[0-9]{1,3}([+*-][0-9]{1,3}){0,4}") {
        let expr = summed();
        let bytes = input.as_bytes();

        let mut first = byte_context(bytes);
        let first_matched = first.parse(&expr.pat());
        let mut second = byte_context(bytes);
        let second_matched = second.parse(&expr.pat());

        prop_assert_eq!(first_matched, second_matched);
        prop_assert_eq!(first.position(), second.position());
        prop_assert_eq!(first.matches(), second.matches());
    }

    /// Round trip: the root match covers exactly the consumed prefix of the
    /// input.
    #[test]
    fn root_match_tiles_the_consumed_prefix(input in "[0-9]{1,3}(\\+[0-9]{1,3}){0,4}(x{0,3})") {
        let expr = summed();
        let bytes = input.as_bytes();
        let mut ctx = byte_context(bytes);
        prop_assert!(ctx.parse(&expr.pat()));
        let consumed = &bytes[..ctx.position().offset()];
        prop_assert_eq!(ctx.matches().len(), 1);
        prop_assert_eq!(ctx.matches()[0].content(ctx.source()), consumed);
    }

    /// The left-recursion resolver never loops: growth is bounded by input
    /// length, so even adversarial operator soup finishes and any match is
    /// a prefix of the input.
    #[test]
    fn left_recursion_terminates_on_arbitrary_soup(input in "[0-9+*-]{0,12}") {
        let expr = summed();
        let bytes = input.as_bytes();
        let mut ctx = byte_context(bytes);
        let matched = ctx.parse(&expr.pat());
        prop_assert!(ctx.position().offset() <= bytes.len());
        if !matched {
            prop_assert_eq!(ctx.position().offset(), 0);
        }
    }
}
