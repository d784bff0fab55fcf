//! Engine state for a single parse.
//!
//! A [`Context`] is constructed per parse, mutated during evaluation, and
//! surrendered to the caller on completion. It owns every piece of
//! parse-time state: the cursor, the committed match list, the active
//! left-recursion frames, and the recorded errors. The input itself is only
//! borrowed; matches reference it by position.
//!
//! # Speculation
//!
//! Backtracking works through [`Snapshot`]s: save before attempting a
//! branch, [`restore`](Context::restore) on local failure. A snapshot is
//! just the cursor position and the match-list length, so both operations
//! are O(1) — the match list is append-only and rolls back by truncation,
//! never by cloning.

use crate::error::ErrorRecord;
use crate::expr::Pattern;
use crate::rule::LrFrame;
use crate::source::SourceConfig;
use crate::span::Pos;
use crate::tree::Match;
use std::cmp::Ordering;

/// Restorable parse state: cursor position and committed match count.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Snapshot {
    pos: Pos,
    matches: usize,
}

impl Snapshot {
    /// The cursor position captured by this snapshot.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

/// Mutable engine state threaded through every expression.
///
/// `E` is the input element type; `I` the host-chosen match identifier.
pub struct Context<'s, E, I = ()> {
    source: &'s [E],
    config: SourceConfig<E>,
    pos: Pos,
    matches: Vec<Match<I>>,
    frames: Vec<LrFrame<I>>,
    errors: Vec<ErrorRecord>,
    depth: usize,
    depth_limit: Option<usize>,
    cancel: Option<Box<dyn Fn() -> bool + 's>>,
}

impl<'s, E, I> Context<'s, E, I> {
    /// Create a context over `source` with the given comparison config.
    pub fn new(source: &'s [E], config: SourceConfig<E>) -> Self {
        Context {
            source,
            config,
            pos: Pos::START,
            matches: Vec::new(),
            frames: Vec::new(),
            errors: Vec::new(),
            depth: 0,
            depth_limit: None,
            cancel: None,
        }
    }

    /// Fail rule entries past `limit` active rule invocations.
    ///
    /// The failure is well-defined: an [`ErrorRecord`] is recorded and the
    /// rule reports no match, exactly as if its body had not matched.
    #[must_use]
    pub fn with_depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = Some(limit);
        self
    }

    /// Install a cancellation hook, polled at rule entries only.
    ///
    /// When `poll` returns true, the current rule (and transitively the
    /// whole parse) fails with a recorded error.
    #[must_use]
    pub fn with_cancel(mut self, poll: impl Fn() -> bool + 's) -> Self {
        self.cancel = Some(Box::new(poll));
        self
    }

    /// Evaluate `root` from the current position.
    pub fn parse(&mut self, root: &Pattern<E, I>) -> bool {
        root.parse(self)
    }

    // --- Cursor ---

    /// The borrowed input.
    pub fn source(&self) -> &'s [E] {
        self.source
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> Pos {
        self.pos
    }

    /// The element under the cursor, or `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<&'s E> {
        self.source.get(self.pos.offset())
    }

    /// Check if the cursor is at end of input.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos.offset() >= self.source.len()
    }

    /// True when the whole input has been consumed.
    ///
    /// A root expression returning true does not imply this; callers that
    /// require a complete parse check it separately.
    pub fn fully_consumed(&self) -> bool {
        self.at_end()
    }

    /// Consume one element, returning it, or `None` at end of input.
    #[inline]
    pub fn advance(&mut self) -> Option<&'s E> {
        let element = self.source.get(self.pos.offset())?;
        self.pos.bump(self.config.is_newline(element));
        Some(element)
    }

    /// Jump to a position previously obtained from this context.
    #[inline]
    pub(crate) fn set_position(&mut self, pos: Pos) {
        self.pos = pos;
    }

    // --- Element comparison ---

    /// Compare two elements for equality under the source config.
    #[inline]
    pub fn elements_equal(&self, a: &E, b: &E) -> bool {
        self.config.elements_equal(a, b)
    }

    /// Order two elements under the source config.
    #[inline]
    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        self.config.compare(a, b)
    }

    // --- Speculation ---

    /// Capture the restorable state. O(1).
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            matches: self.matches.len(),
        }
    }

    /// Roll back to a snapshot: reset the cursor and truncate the match
    /// list. O(1) except for dropping abandoned matches.
    ///
    /// This is the only way to abandon tentative work; every compound
    /// expression restores on local failure. Recorded errors are *not*
    /// rolled back.
    #[inline]
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.pos = snapshot.pos;
        self.matches.truncate(snapshot.matches);
    }

    // --- Matches ---

    /// Matches committed so far, in source order.
    pub fn matches(&self) -> &[Match<I>] {
        &self.matches
    }

    /// Consume the context, keeping only the match list.
    pub fn into_matches(self) -> Vec<Match<I>> {
        self.matches
    }

    /// Append a committed match.
    #[inline]
    pub fn push_match(&mut self, m: Match<I>) {
        self.matches.push(m);
    }

    /// Current match-list length, for use with [`matches_since`](Context::matches_since),
    /// [`truncate_matches`](Context::truncate_matches) and
    /// [`drain_matches`](Context::drain_matches).
    #[inline]
    pub fn match_mark(&self) -> usize {
        self.matches.len()
    }

    /// Matches appended since `mark`.
    pub fn matches_since(&self, mark: usize) -> &[Match<I>] {
        &self.matches[mark..]
    }

    /// Drop every match appended since `mark`.
    #[inline]
    pub fn truncate_matches(&mut self, mark: usize) {
        self.matches.truncate(mark);
    }

    /// Remove and return every match appended since `mark`.
    pub fn drain_matches(&mut self, mark: usize) -> Vec<Match<I>> {
        self.matches.split_off(mark)
    }

    pub(crate) fn extend_matches(&mut self, matches: Vec<Match<I>>) {
        self.matches.extend(matches);
    }

    // --- Errors ---

    /// Errors recorded by resynchronization points and engine limits.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Record a resumable error. Does not fail the parse.
    pub fn record_error(&mut self, record: ErrorRecord) {
        self.errors.push(record);
    }

    // --- Left-recursion frames (rule bookkeeping) ---

    pub(crate) fn push_frame(&mut self, frame: LrFrame<I>) {
        self.frames.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) -> Option<LrFrame<I>> {
        self.frames.pop()
    }

    pub(crate) fn top_frame_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    pub(crate) fn frame(&self, index: usize) -> &LrFrame<I> {
        &self.frames[index]
    }

    pub(crate) fn frame_mut(&mut self, index: usize) -> &mut LrFrame<I> {
        &mut self.frames[index]
    }

    /// Innermost active frame owned by the given rule, if any.
    pub(crate) fn find_frame(&self, rule: crate::rule::RuleId) -> Option<usize> {
        self.frames.iter().rposition(|frame| frame.rule == rule)
    }

    // --- Rule entry guards ---

    /// Depth/cancellation check at rule entry. Records an error and returns
    /// false when the rule must not be evaluated.
    pub(crate) fn enter_rule(&mut self) -> bool {
        if let Some(limit) = self.depth_limit {
            if self.depth >= limit {
                self.record_error(ErrorRecord::depth_exceeded(self.pos, limit));
                return false;
            }
        }
        let cancelled = self.cancel.as_ref().is_some_and(|poll| poll());
        if cancelled {
            self.record_error(ErrorRecord::cancelled(self.pos));
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave_rule(&mut self) {
        self.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte_context(source: &[u8]) -> Context<'_, u8, &'static str> {
        Context::new(source, SourceConfig::ascii())
    }

    #[test]
    fn advance_tracks_lines() {
        let mut ctx = byte_context(b"a\nb");
        assert_eq!(ctx.advance(), Some(&b'a'));
        assert_eq!(ctx.advance(), Some(&b'\n'));
        assert_eq!(ctx.position().line(), 2);
        assert_eq!(ctx.position().column(), 1);
        assert_eq!(ctx.advance(), Some(&b'b'));
        assert_eq!(ctx.advance(), None);
        assert!(ctx.fully_consumed());
    }

    #[test]
    fn snapshot_restore_is_exact() {
        let mut ctx = byte_context(b"abc");
        ctx.advance();
        let begin = ctx.position();
        let snap = ctx.snapshot();
        ctx.advance();
        let end = ctx.position();
        ctx.push_match(crate::tree::Match::leaf("m", begin, end));
        ctx.restore(snap);
        assert_eq!(ctx.snapshot(), snap);
        assert!(ctx.matches().is_empty());
        assert_eq!(ctx.position().offset(), 1);
    }

    #[test]
    fn drain_and_truncate_operate_from_marks() {
        let mut ctx = byte_context(b"ab");
        let begin = ctx.position();
        ctx.advance();
        let mid = ctx.position();
        ctx.advance();
        let end = ctx.position();
        ctx.push_match(crate::tree::Match::leaf("first", begin, mid));
        let mark = ctx.match_mark();
        ctx.push_match(crate::tree::Match::leaf("second", mid, end));
        assert_eq!(ctx.matches_since(mark).len(), 1);
        let drained = ctx.drain_matches(mark);
        assert_eq!(drained.len(), 1);
        assert_eq!(*drained[0].id(), "second");
        assert_eq!(ctx.matches().len(), 1);
    }

    #[test]
    fn depth_limit_records_an_error() {
        let mut ctx = byte_context(b"x").with_depth_limit(0);
        assert!(!ctx.enter_rule());
        assert_eq!(ctx.errors().len(), 1);
        assert!(ctx.errors()[0].message().contains("depth"));
    }

    #[test]
    fn cancel_hook_is_polled_at_rule_entry() {
        let mut ctx = byte_context(b"x").with_cancel(|| true);
        assert!(!ctx.enter_rule());
        assert!(ctx.errors()[0].message().contains("cancelled"));
    }
}
