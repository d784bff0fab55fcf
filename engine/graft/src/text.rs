//! Byte-text conveniences.
//!
//! Thin wrappers over the core constructors for the common case of parsing
//! ASCII text as `&[u8]`. Nothing here is special-cased in the engine.

use crate::combinator::{choice, sequence, zero_or_more};
use crate::expr::Pattern;
use crate::primitive::{terminal_range, terminal_set, terminal_string};

/// The bytes of `literal`, in order.
pub fn lit<I: 'static>(literal: &str) -> Pattern<u8, I> {
    terminal_string(literal.as_bytes())
}

/// A decimal digit.
pub fn digit<I: 'static>() -> Pattern<u8, I> {
    terminal_range(b'0', b'9')
}

/// A hexadecimal digit, either case.
pub fn hex_digit<I: 'static>() -> Pattern<u8, I> {
    choice([
        terminal_range(b'0', b'9'),
        terminal_range(b'a', b'f'),
        terminal_range(b'A', b'F'),
    ])
}

/// An ASCII letter.
pub fn alpha<I: 'static>() -> Pattern<u8, I> {
    choice([terminal_range(b'a', b'z'), terminal_range(b'A', b'Z')])
}

/// An ASCII letter or decimal digit.
pub fn alnum<I: 'static>() -> Pattern<u8, I> {
    choice([alpha(), digit()])
}

/// A single space, tab, carriage return, or newline.
pub fn whitespace<I: 'static>() -> Pattern<u8, I> {
    terminal_set(b" \t\r\n")
}

/// A C-style identifier: letter or underscore, then letters, digits, or
/// underscores.
pub fn ident<I: 'static>() -> Pattern<u8, I> {
    let head = choice([alpha(), terminal_set(b"_")]);
    let tail = choice([alnum(), terminal_set(b"_")]);
    sequence([head, zero_or_more(tail)])
}
