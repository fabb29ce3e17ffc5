//! Low-level primitives for the C/C++ tokenizer.
//!
//! This crate is standalone (no dependency on the tokenizer proper) so
//! external tools can reuse the buffer and search primitives. It provides:
//!
//! - [`TextBuffer`]: an owned, growable text arena supporting in-place
//!   region splicing, the unit of truth for both original and
//!   macro-expanded source text.
//! - [`kmp_find`] / [`first_token_position`]: linear-time substring and
//!   word-boundary identifier search, without quadratic backtracking.

mod buffer;
mod search;

pub use buffer::TextBuffer;
pub use search::{first_token_position, kmp_find, kmp_table};

/// Returns `true` if `b` can start an identifier (`[A-Za-z_]` or a
/// non-ASCII byte, so multi-byte UTF-8 sequences stay inside one lexeme).
#[inline]
#[must_use]
pub fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

/// Returns `true` if `b` can continue an identifier.
#[inline]
#[must_use]
pub fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
