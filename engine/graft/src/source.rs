//! Input configuration: element comparison and newline recognition.
//!
//! The engine never compares elements through `PartialEq` directly; every
//! comparison goes through a [`SourceConfig`] plugged into the context at
//! construction. That keeps case folding (or any other element-level
//! equivalence a host wants) out of the expression tree: the same grammar
//! parses case-sensitively or not depending only on the config.

use std::cmp::Ordering;

/// How the engine compares input elements and tracks line breaks.
///
/// A config is a plain value handed to [`Context`](crate::Context) at
/// construction. Line/column tracking is enabled by supplying a newline
/// recognizer and disabled by [`untracked`](SourceConfig::untracked).
pub struct SourceConfig<E> {
    eq: fn(&E, &E) -> bool,
    cmp: fn(&E, &E) -> Ordering,
    newline: Option<fn(&E) -> bool>,
}

// Manual impls: fn pointers are always `Copy`, so no `E: Clone` bound is
// needed (derive would add one).
impl<E> Clone for SourceConfig<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for SourceConfig<E> {}

impl<E: Ord> SourceConfig<E> {
    /// Exact element comparison, no line tracking.
    pub fn exact() -> Self {
        SourceConfig {
            eq: |a, b| a == b,
            cmp: |a, b| a.cmp(b),
            newline: None,
        }
    }
}

impl<E: Ord> Default for SourceConfig<E> {
    fn default() -> Self {
        Self::exact()
    }
}

impl SourceConfig<u8> {
    /// ASCII text: exact bytes, `\n` recognized for line/column tracking.
    pub fn ascii() -> Self {
        Self::exact().newline(|b| *b == b'\n')
    }

    /// ASCII text compared case-insensitively.
    pub fn ascii_case_insensitive() -> Self {
        SourceConfig {
            eq: |a, b| a.eq_ignore_ascii_case(b),
            cmp: |a, b| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()),
            newline: Some(|b| *b == b'\n'),
        }
    }
}

impl SourceConfig<char> {
    /// Character text: exact comparison, `\n` recognized for line tracking.
    pub fn chars() -> Self {
        Self::exact().newline(|c| *c == '\n')
    }

    /// Character text compared ASCII-case-insensitively.
    pub fn chars_case_insensitive() -> Self {
        SourceConfig {
            eq: |a, b| a.eq_ignore_ascii_case(b),
            cmp: |a, b| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()),
            newline: Some(|c| *c == '\n'),
        }
    }
}

impl<E> SourceConfig<E> {
    /// Replace the newline recognizer, enabling line/column tracking.
    #[must_use]
    pub fn newline(mut self, recognizer: fn(&E) -> bool) -> Self {
        self.newline = Some(recognizer);
        self
    }

    /// Disable line/column tracking.
    #[must_use]
    pub fn untracked(mut self) -> Self {
        self.newline = None;
        self
    }

    #[inline]
    pub(crate) fn elements_equal(&self, a: &E, b: &E) -> bool {
        (self.eq)(a, b)
    }

    #[inline]
    pub(crate) fn compare(&self, a: &E, b: &E) -> Ordering {
        (self.cmp)(a, b)
    }

    #[inline]
    pub(crate) fn is_newline(&self, element: &E) -> bool {
        self.newline.is_some_and(|recognize| recognize(element))
    }
}
