//! The macro expander: usage detection, argument splitting, backward
//! in-buffer substitution, and recursion guarding.
//!
//! Expansion is best-effort, never guaranteed-correct preprocessing:
//! every anomaly (argument-count mismatch, missing closing parenthesis,
//! detected self-recursion) degrades to treating the identifier as a
//! plain token rather than failing.

use cpptok_core::{is_ident_continue, is_ident_start};
use tracing::trace;

use crate::macro_table::{MacroDef, MacroId};
use crate::tokenizer::Tokenizer;

/// One active expansion: the half-open buffer region `[begin, end)` that
/// resulted from expanding `id`.
///
/// The record list is ordered innermost-first. Membership by macro
/// identity is the recursion guard; a record is popped once the cursor
/// advances past its `end`, modeling "we have left the textual region
/// produced by that expansion."
#[derive(Clone, Copy, Debug)]
pub(super) struct ExpandedMacro {
    pub begin: usize,
    pub end: usize,
    pub id: MacroId,
}

impl Tokenizer<'_> {
    /// Decide whether the identifier-shaped `lexeme` (spanning from
    /// `lexeme_start` to the cursor) is a macro usage and, if so, rewrite
    /// the buffer so the next extraction reads expanded text.
    ///
    /// Returns `true` if the buffer was rewritten.
    pub(super) fn check_macro_usage_and_replace(
        &mut self,
        lexeme: &str,
        lexeme_start: usize,
    ) -> bool {
        let Some(id) = self.table.lookup(lexeme) else {
            return false;
        };
        if self.expanded.iter().any(|record| record.id == id) {
            // Already inside an expansion of this macro: emit the literal
            // name instead of looping forever.
            trace!(name = lexeme, "recursive expansion suppressed");
            return false;
        }
        let Some(def) = self.table.definition(id) else {
            return false;
        };

        let (expanded, usage_end) = if def.function_like {
            let def = def.clone();
            let saved = self.snapshot();
            let Some(arguments) = self.split_arguments() else {
                // No argument list follows: an uncalled function-like
                // macro name is plain text.
                self.restore(saved);
                return false;
            };
            (Self::macro_expanded_text(&def, &arguments), self.pos)
        } else {
            (def.replacement.clone(), self.pos)
        };

        self.replace_buffer_text(lexeme_start, usage_end, &expanded, Some(id));
        true
    }

    /// Split a function-like macro call's argument list.
    ///
    /// The cursor is expected at (or on whitespace before) the opening
    /// `(`. Arguments are the top-level comma-separated substrings
    /// between the balanced parentheses; nested parentheses, brackets,
    /// braces, and string literals inside an argument do not separate.
    /// The cursor ends just past the closing `)`.
    ///
    /// Returns `None` (cursor position unspecified) when no opening
    /// parenthesis follows or the list is unterminated.
    pub(super) fn split_arguments(&mut self) -> Option<Vec<String>> {
        loop {
            if self.is_eof() {
                return None;
            }
            match self.current_char() {
                b' ' | b'\t' => self.skip_whitespace(),
                b'\n' | b'\r' => {
                    self.advance();
                }
                b'(' => break,
                _ => return None,
            }
        }
        self.advance(); // '('

        let mut arguments = Vec::new();
        let mut current = String::new();
        let mut paren = 0u32;
        let mut bracket = 0u32;
        let mut brace = 0u32;

        while !self.is_eof() {
            let c = self.current_char();
            match c {
                b')' if paren == 0 => {
                    self.advance();
                    let last = current.trim();
                    if !last.is_empty() || !arguments.is_empty() {
                        arguments.push(last.to_string());
                    }
                    return Some(arguments);
                }
                b',' if paren == 0 && bracket == 0 && brace == 0 => {
                    self.advance();
                    arguments.push(current.trim().to_string());
                    current.clear();
                }
                b'"' | b'\'' => {
                    let start = self.pos;
                    self.skip_string();
                    current.push_str(&self.buffer.text(start, self.pos));
                }
                _ => {
                    match c {
                        b'(' => paren += 1,
                        b')' => paren = paren.saturating_sub(1),
                        b'[' => bracket += 1,
                        b']' => bracket = bracket.saturating_sub(1),
                        b'{' => brace += 1,
                        b'}' => brace = brace.saturating_sub(1),
                        _ => {}
                    }
                    current.push(char::from(self.advance()));
                }
            }
        }
        None
    }

    /// Substitute each parameter occurrence in the macro's replacement
    /// text with the corresponding supplied argument, positionally by
    /// parameter name.
    ///
    /// The replacement is scanned once, identifier by identifier, so an
    /// argument that happens to contain another parameter's name is
    /// never re-substituted. A mismatched argument count is tolerated:
    /// missing arguments substitute as empty text.
    pub(super) fn macro_expanded_text(def: &MacroDef, arguments: &[String]) -> String {
        let body = def.replacement.as_bytes();
        let mut out = String::with_capacity(def.replacement.len());
        let mut i = 0usize;
        while i < body.len() {
            let b = body[i];
            if is_ident_start(b) {
                let start = i;
                while i < body.len() && is_ident_continue(body[i]) {
                    i += 1;
                }
                let ident = &def.replacement[start..i];
                match def.params.iter().position(|p| p == ident) {
                    Some(k) => out.push_str(arguments.get(k).map_or("", String::as_str)),
                    None => out.push_str(ident),
                }
            } else if b == b'"' || b == b'\'' {
                // Copy literals verbatim; parameter names inside them
                // are not substituted.
                let start = i;
                i += 1;
                while i < body.len() {
                    if body[i] == b'\\' {
                        i = (i + 2).min(body.len());
                        continue;
                    }
                    if body[i] == b {
                        i += 1;
                        break;
                    }
                    i += 1;
                }
                out.push_str(&def.replacement[start..i]);
            } else {
                out.push(char::from(b));
                i += 1;
            }
        }
        out
    }

    /// Backward buffer substitution: replace the already-consumed usage
    /// region `[start, end)` with `text` and reposition the cursor to
    /// the start of the inserted text so it is re-lexed.
    ///
    /// When `origin` names the macro that produced `text`, a new
    /// expansion record is pushed (front of the list) and the offsets of
    /// surviving records after the region shift by the length delta. The
    /// peek cache is invalidated: the buffer it was lexed from is gone.
    ///
    /// Returns `false` (buffer untouched) if `origin` is already on the
    /// active-expansion list.
    pub fn replace_buffer_text(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        origin: Option<MacroId>,
    ) -> bool {
        if !self.is_ready() {
            return false;
        }
        if let Some(id) = origin {
            if self.expanded.iter().any(|record| record.id == id) {
                return false;
            }
        }

        let delta = self.buffer.splice(start, end, text.as_bytes());
        trace!(start, end, new_len = text.len(), "buffer splice");

        let shift = |offset: usize| -> usize {
            if offset >= end {
                usize::try_from(offset as isize + delta).unwrap_or(0)
            } else {
                offset
            }
        };
        for record in &mut self.expanded {
            record.begin = shift(record.begin);
            record.end = shift(record.end);
        }

        if let Some(id) = origin {
            self.expanded.push_front(ExpandedMacro {
                begin: start,
                end: start + text.len(),
                id,
            });
        }

        self.pos = start;
        self.peek_available = false;
        self.peek_token.clear();
        true
    }
}
