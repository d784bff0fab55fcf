//! Resynchronization after in-sequence failures.
//!
//! An [`error_resume`] point marks a place where a sequence can pick itself
//! back up: when an earlier element fails, the failure is recorded and input
//! is skipped until the anchor matches, instead of failing the whole
//! sequence. A sequence without a resume point keeps the ordinary
//! fail-and-roll-back behavior, and no errors are recorded.

use crate::context::Context;
use crate::error::ErrorRecord;
use crate::expr::{Expr, Pattern};
use tracing::debug;

struct Resume<E, I> {
    anchor: Pattern<E, I>,
}

impl<E, I> Expr<E, I> for Resume<E, I> {
    // Reached in the normal course of its sequence (nothing failed
    // earlier): try the anchor where it stands, and only on a miss record
    // the error and start skipping.
    fn parse(&self, ctx: &mut Context<'_, E, I>) -> bool {
        let probe = ctx.snapshot();
        if self.anchor.parse(ctx) {
            return true;
        }
        ctx.restore(probe);
        ctx.record_error(ErrorRecord::expected(ctx.position(), &self.anchor.describe()));
        resynchronize(ctx, &self.anchor);
        true
    }

    fn describe(&self) -> String {
        self.anchor.describe()
    }

    fn resume_target(&self) -> Option<&Pattern<E, I>> {
        Some(&self.anchor)
    }
}

/// Mark `anchor` as a resynchronization point for the enclosing sequence.
///
/// After a recorded failure, input is skipped element by element until the
/// anchor matches; the sequence then proceeds past the anchor. If end of
/// input arrives first, parsing resumes there — the recorded error is the
/// trace that something was skipped or missing.
pub fn error_resume<E, I>(anchor: Pattern<E, I>) -> Pattern<E, I>
where
    E: 'static,
    I: 'static,
{
    Pattern::new(Resume { anchor })
}

/// Skip input until `anchor` matches or end of input is reached.
///
/// Each probe runs under a snapshot, so failed probes leave no trace; the
/// matches of the successful probe (if the anchor records any) are
/// committed.
pub(crate) fn resynchronize<E, I>(ctx: &mut Context<'_, E, I>, anchor: &Pattern<E, I>) {
    let mut skipped = 0usize;
    loop {
        let probe = ctx.snapshot();
        if anchor.parse(ctx) {
            break;
        }
        ctx.restore(probe);
        if ctx.advance().is_none() {
            break;
        }
        skipped += 1;
    }
    debug!(skipped, offset = ctx.position().offset(), "resynchronized");
}
