//! Stack headroom for deeply recursive parse expressions.
//!
//! A backtracking recursive-descent evaluation nests one native stack frame
//! per expression node, and pathological grammars nest proportionally to
//! grammar depth times input length. Rather than crash with a stack overflow,
//! recursion points grow the stack on demand.
//!
//! # Platform Support
//!
//! - **Native targets**: grows the stack with the `stacker` crate when the
//!   remaining headroom drops below the red zone.
//! - **WASM targets**: plain passthrough (WASM manages its own stack).
//!
//! # Usage
//!
//! Wrap each recursion point with [`ensure_headroom`]:
//!
//! ```text
//! fn evaluate(&self, ctx: &mut Context<'_, E, I>) -> bool {
//!     ensure_headroom(|| {
//!         // ... recurse into the rule body ...
//!     })
//! }
//! ```
//!
//! # Configuration
//!
//! - **Red zone**: 128KB. Combinator frames are wider than plain descent
//!   frames (saved snapshots, iterators over alternatives), so the threshold
//!   leaves room for a full expression chain between checks.
//! - **Growth size**: 2MB per allocation, enough for tens of thousands of
//!   additional expression frames before the next check fires.

/// Minimum stack space to keep available (128KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Stack space to allocate when growing (2MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_GROWTH: usize = 2 * 1024 * 1024;

/// Ensure sufficient stack headroom before executing `f`.
///
/// If the remaining stack is below the red zone threshold, a fresh segment is
/// allocated and `f` runs on it. Call this at recursion points only; checking
/// on every expression would dominate parse time.
///
/// # Platform Behavior
///
/// - **Native**: `stacker::maybe_grow` with the constants above
/// - **WASM**: calls `f()` directly
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_headroom<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_GROWTH, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_headroom<R>(f: impl FnOnce() -> R) -> R {
    f()
}
