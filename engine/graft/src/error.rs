//! Resumable-error records.
//!
//! Local parse failures are silent: an expression returns `false` and the
//! caller rolls back. An [`ErrorRecord`] is only written when the engine
//! decides to *keep going* past a failure — a sequence resynchronizing to an
//! [`error_resume`](crate::error_resume) anchor — or when an engine limit
//! trips. Recording an error never fails the parse by itself; the top-level
//! result may still be success.

use crate::span::Pos;
use std::fmt;

/// A recorded, resumable parse error.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorRecord {
    pos: Pos,
    message: String,
}

impl ErrorRecord {
    /// Position the failure was observed at.
    pub fn position(&self) -> Pos {
        self.pos
    }

    /// Human-readable description of what went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }

    // Constructors are `#[cold]`: the `format!` allocations must not keep
    // the surrounding parse loops from inlining.

    /// A sequence element failed and parsing resynchronized past it.
    #[cold]
    pub(crate) fn expected(pos: Pos, what: &str) -> Self {
        ErrorRecord {
            pos,
            message: format!("expected {what}"),
        }
    }

    /// The configured recursion-depth limit was reached at a rule entry.
    #[cold]
    pub(crate) fn depth_exceeded(pos: Pos, limit: usize) -> Self {
        ErrorRecord {
            pos,
            message: format!("recursion depth limit {limit} exceeded"),
        }
    }

    /// The host's cancellation hook reported true at a rule entry.
    #[cold]
    pub(crate) fn cancelled(pos: Pos) -> Self {
        ErrorRecord {
            pos,
            message: "parse cancelled by host".to_string(),
        }
    }

    /// A rule was invoked before a body was supplied, or after its `Rule`
    /// handle was dropped.
    #[cold]
    pub(crate) fn undefined_rule(pos: Pos, name: &str) -> Self {
        ErrorRecord {
            pos,
            message: format!("rule `{name}` has no body"),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.pos.line(),
            self.pos.column(),
            self.message
        )
    }
}
