//! Engine tests.
//!
//! Tests are organized into modules by category:
//! - `scenarios`: End-to-end grammars exercising the whole algebra —
//!   recognizers, captures, the left-recursive calculator, and error
//!   resynchronization.
//! - `properties`: Property tests for the engine invariants — rollback
//!   purity, ordered-choice determinism, repetition termination, and
//!   idempotence.

mod properties;
