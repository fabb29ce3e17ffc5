use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{first_token_position, kmp_find, kmp_table};

// === Failure Table ===

#[test]
fn table_for_single_byte() {
    assert_eq!(kmp_table(b"a"), vec![-1]);
}

#[test]
fn table_for_repeating_pattern() {
    // "aaaa": each position resumes at the previous prefix length.
    assert_eq!(kmp_table(b"aaaa"), vec![-1, 0, 1, 2]);
}

#[test]
fn table_for_abab() {
    assert_eq!(kmp_table(b"abab"), vec![-1, 0, 0, 1]);
}

// === kmp_find ===

#[test]
fn find_at_start() {
    assert_eq!(kmp_find(b"hello world", b"hello"), Some(0));
}

#[test]
fn find_in_middle() {
    assert_eq!(kmp_find(b"xxxAAAyyy", b"AAA"), Some(3));
}

#[test]
fn find_missing() {
    assert_eq!(kmp_find(b"abcdef", b"xyz"), None);
}

#[test]
fn find_empty_pattern_matches_at_zero() {
    assert_eq!(kmp_find(b"abc", b""), Some(0));
}

#[test]
fn find_pattern_longer_than_text() {
    assert_eq!(kmp_find(b"ab", b"abc"), None);
}

#[test]
fn find_with_partial_overlaps() {
    // Backtracking case: "aab" inside "aaab".
    assert_eq!(kmp_find(b"aaab", b"aab"), Some(1));
    assert_eq!(kmp_find(b"ababac", b"abac"), Some(2));
}

// === first_token_position ===

#[test]
fn token_position_respects_word_boundaries() {
    // "a" must not match inside "max" or "a1".
    assert_eq!(first_token_position(b"max + a1 + a", b"a"), Some(11));
}

#[test]
fn token_position_at_start() {
    assert_eq!(first_token_position(b"a + b", b"a"), Some(0));
}

#[test]
fn token_position_none_when_only_embedded() {
    assert_eq!(first_token_position(b"max(a1, fab)", b"a"), None);
}

#[test]
fn token_position_empty_ident() {
    assert_eq!(first_token_position(b"abc", b""), None);
}

// === Property: agreement with the naive search ===

proptest! {
    #[test]
    fn kmp_matches_naive_find(
        text in proptest::collection::vec(proptest::num::u8::ANY, 0..64),
        pattern in proptest::collection::vec(proptest::num::u8::ANY, 1..8),
    ) {
        let naive = text
            .windows(pattern.len())
            .position(|w| w == pattern.as_slice());
        prop_assert_eq!(kmp_find(&text, &pattern), naive);
    }
}
