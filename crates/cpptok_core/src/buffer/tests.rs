use pretty_assertions::assert_eq;

use crate::TextBuffer;

// === Construction ===

#[test]
fn empty_buffer() {
    let buf = TextBuffer::new();
    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
    assert_eq!(buf.byte_at(0), 0);
}

#[test]
fn from_str_copies_content() {
    let buf = TextBuffer::from_str("int x;");
    assert_eq!(buf.len(), 6);
    assert_eq!(buf.as_bytes(), b"int x;");
}

// === Sentinel Access ===

#[test]
fn byte_at_in_bounds() {
    let buf = TextBuffer::from_str("abc");
    assert_eq!(buf.byte_at(0), b'a');
    assert_eq!(buf.byte_at(2), b'c');
}

#[test]
fn byte_at_past_end_is_sentinel() {
    let buf = TextBuffer::from_str("abc");
    assert_eq!(buf.byte_at(3), 0);
    assert_eq!(buf.byte_at(1000), 0);
}

// === Slicing ===

#[test]
fn slice_clamps_bounds() {
    let buf = TextBuffer::from_str("hello");
    assert_eq!(buf.slice(0, 5), b"hello");
    assert_eq!(buf.slice(2, 100), b"llo");
    assert_eq!(buf.slice(7, 9), b"");
}

#[test]
fn text_decodes_utf8() {
    let buf = TextBuffer::from_str("héllo");
    assert_eq!(buf.text(0, buf.len()), "héllo");
}

// === Splicing ===

#[test]
fn splice_same_length() {
    let mut buf = TextBuffer::from_str("xxxAAAyyy");
    let delta = buf.splice(3, 6, b"BBB");
    assert_eq!(delta, 0);
    assert_eq!(buf.as_bytes(), b"xxxBBByyy");
}

#[test]
fn splice_grows_buffer() {
    let mut buf = TextBuffer::from_str("xxxAAAyyy");
    let delta = buf.splice(3, 6, b"BBBB");
    assert_eq!(delta, 1);
    assert_eq!(buf.as_bytes(), b"xxxBBBByyy");
    assert_eq!(buf.len(), 10);
}

#[test]
fn splice_shrinks_buffer() {
    let mut buf = TextBuffer::from_str("xxxAAAAyyy");
    let delta = buf.splice(3, 7, b"Z");
    assert_eq!(delta, -3);
    assert_eq!(buf.as_bytes(), b"xxxZyyy");
}

#[test]
fn splice_with_empty_replacement_deletes() {
    let mut buf = TextBuffer::from_str("abcdef");
    buf.splice(2, 4, b"");
    assert_eq!(buf.as_bytes(), b"abef");
}

#[test]
fn splice_out_of_range_is_clamped() {
    let mut buf = TextBuffer::from_str("abc");
    buf.splice(10, 20, b"xyz");
    assert_eq!(buf.as_bytes(), b"abcxyz");
}

// === Searching ===

#[test]
fn find_newline_basic() {
    let buf = TextBuffer::from_str("ab\ncd\nef");
    assert_eq!(buf.find_newline(0), Some(2));
    assert_eq!(buf.find_newline(3), Some(5));
    assert_eq!(buf.find_newline(6), None);
}

#[test]
fn find_byte_past_end() {
    let buf = TextBuffer::from_str("ab");
    assert_eq!(buf.find_byte(b'a', 5), None);
}
