//! Knuth-Morris-Pratt substring search.
//!
//! Linear-time substring search over raw bytes, plus a word-boundary
//! variant for locating whole identifiers. A naive scan backtracks
//! quadratically on pathological patterns; KMP precomputes the
//! partial-match table once per pattern and runs in `O(text + pattern)`.

use crate::is_ident_continue;

/// Precompute the KMP partial-match (failure) table for `pattern`.
///
/// `table[i]` is the length of the longest proper prefix of
/// `pattern[..=i]` that is also a suffix of it, expressed as the pattern
/// index to resume matching from after a mismatch (`-1` for position 0).
#[must_use]
pub fn kmp_table(pattern: &[u8]) -> Vec<i32> {
    let mut table = vec![0i32; pattern.len().max(1)];
    table[0] = -1;
    let mut i = 0usize;
    let mut k = -1i32;
    while i + 1 < pattern.len() {
        if k == -1 || pattern[i] == pattern[k as usize] {
            i += 1;
            k += 1;
            table[i] = k;
        } else {
            k = table[k as usize];
        }
    }
    table
}

/// First occurrence of `pattern` in `text`, or `None`.
///
/// Empty patterns match at position 0. Linear time in `text.len()`.
#[must_use]
pub fn kmp_find(text: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() {
        return Some(0);
    }
    if pattern.len() > text.len() {
        return None;
    }
    let table = kmp_table(pattern);
    let mut ti = 0usize;
    let mut pi = 0i32;
    while ti < text.len() {
        if pi == -1 || text[ti] == pattern[pi as usize] {
            ti += 1;
            pi += 1;
            if pi as usize == pattern.len() {
                return Some(ti - pattern.len());
            }
        } else {
            pi = table[pi as usize];
        }
    }
    None
}

/// First occurrence of the identifier `ident` in `text` at word
/// boundaries: the bytes immediately before and after the match must not
/// be identifier characters.
///
/// An identifier named `a` does not match inside `max` or `a1`.
/// Returns `None` for an empty `ident`.
#[must_use]
pub fn first_token_position(text: &[u8], ident: &[u8]) -> Option<usize> {
    if ident.is_empty() {
        return None;
    }
    let mut from = 0usize;
    while from + ident.len() <= text.len() {
        let pos = from + kmp_find(&text[from..], ident)?;
        let before_ok = pos == 0 || !is_ident_continue(text[pos - 1]);
        let after = pos + ident.len();
        let after_ok = after >= text.len() || !is_ident_continue(text[after]);
        if before_ok && after_ok {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

#[cfg(test)]
mod tests;
