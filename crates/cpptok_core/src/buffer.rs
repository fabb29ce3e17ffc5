//! Owned, mutable text arena with in-place region splicing.
//!
//! The buffer holds the source text being lexed. Macro expansion rewrites
//! it in place: a usage region `[start, end)` is replaced by the expanded
//! text and every offset after the region shifts by the length delta.
//! All accessors are bounds-safe and return a `0x00` sentinel past the
//! end, so callers can scan without explicit bounds checks as long as
//! they treat the sentinel as "no character".

use std::borrow::Cow;

/// Owned, growable text arena.
///
/// The content is stored as bytes. The tokenizer treats bytes `>= 0x80`
/// as identifier characters, so multi-byte UTF-8 sequences pass through
/// lexemes intact without the buffer needing to be char-indexed.
#[derive(Clone, Debug, Default)]
pub struct TextBuffer {
    bytes: Vec<u8>,
}

impl TextBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding a copy of `source`.
    #[must_use]
    pub fn from_str(source: &str) -> Self {
        Self {
            bytes: source.as_bytes().to_vec(),
        }
    }

    /// Create a buffer taking ownership of `source`.
    #[must_use]
    pub fn from_string(source: String) -> Self {
        Self {
            bytes: source.into_bytes(),
        }
    }

    /// Length of the content in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer holds no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte at `pos`, or the `0x00` sentinel when `pos >= len()`.
    #[inline]
    #[must_use]
    pub fn byte_at(&self, pos: usize) -> u8 {
        self.bytes.get(pos).copied().unwrap_or(0)
    }

    /// The raw content bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Slice of the content clamped to buffer bounds.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        let end = end.min(self.bytes.len());
        let start = start.min(end);
        &self.bytes[start..end]
    }

    /// Content of `[start, end)` as text, lossily decoded.
    #[must_use]
    pub fn text(&self, start: usize, end: usize) -> Cow<'_, str> {
        String::from_utf8_lossy(self.slice(start, end))
    }

    /// Replace the half-open region `[start, end)` with `replacement`,
    /// growing or shrinking the buffer in place.
    ///
    /// Offsets after the region shift by
    /// `replacement.len() as isize - (end - start) as isize`, which is
    /// also the return value. Out-of-range bounds are clamped.
    pub fn splice(&mut self, start: usize, end: usize, replacement: &[u8]) -> isize {
        let end = end.min(self.bytes.len());
        let start = start.min(end);
        let removed = end - start;
        self.bytes.splice(start..end, replacement.iter().copied());
        replacement.len() as isize - removed as isize
    }

    /// Position of the first `\n` at or after `from`, if any.
    #[must_use]
    pub fn find_newline(&self, from: usize) -> Option<usize> {
        if from >= self.bytes.len() {
            return None;
        }
        memchr::memchr(b'\n', &self.bytes[from..]).map(|off| from + off)
    }

    /// Position of the first occurrence of `byte` at or after `from`.
    #[must_use]
    pub fn find_byte(&self, byte: u8, from: usize) -> Option<usize> {
        if from >= self.bytes.len() {
            return None;
        }
        memchr::memchr(byte, &self.bytes[from..]).map(|off| from + off)
    }
}

#[cfg(test)]
mod tests;
