//! The lexer core: token extraction with peek/unget, driven by the
//! skipper, the conditional-preprocessor evaluator, and the macro
//! expander.
//!
//! A [`Tokenizer`] is bound to one logical input (file path or in-memory
//! text) and one symbol-table reference for its whole lifetime. After a
//! successful `init`/`init_from_buffer` it is driven token by token via
//! [`get_token`](Tokenizer::get_token) until exhaustion; it is not
//! reused across unrelated inputs.
//!
//! # Macro expansion in place
//!
//! When an identifier-shaped lexeme names a macro, the usage region in
//! the owned buffer is replaced by the expanded text and the cursor is
//! repositioned to the *start* of the inserted text, so the expansion is
//! itself re-lexed (supporting expansion chains):
//!
//! ```text
//! xxxxAAAA(u,v)yyyy          before, cursor after ')'
//! xxxxNNNNNNNNNyyyy          after,  cursor at the first 'N'
//! ```
//!
//! Infinite recursion through mutually-referential definitions is broken
//! by the active-expansion record list (see `expansion.rs`).

use std::collections::VecDeque;
use std::path::Path;

use cpptok_core::{is_ident_continue, is_ident_start, TextBuffer};
use tracing::trace;

use self::expansion::ExpandedMacro;
use crate::loader::{ContentLoader, InitError};
use crate::macro_table::MacroTable;
use crate::options::{TokenizerOptions, TokenizerState};

mod expansion;
mod preprocessor;
mod skip;

/// Three-field cursor snapshot used by the undo and peek slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Snapshot {
    pos: usize,
    line: u32,
    nest: u32,
}

/// Lexer over one source buffer, with best-effort macro expansion and
/// conditional-preprocessor branch selection.
pub struct Tokenizer<'t> {
    options: TokenizerOptions,
    state: TokenizerState,
    table: &'t dyn MacroTable,

    filename: String,
    buffer: TextBuffer,

    /// Cursor: byte position into the buffer, always `<= buffer.len()`.
    pos: usize,
    /// 1-based line number of the cursor.
    line: u32,
    /// Brace nesting depth; `{` increments, `}` decrements (clamped at 0).
    nest: u32,

    /// Snapshot taken at the start of the most recent `get_token`.
    undo: Snapshot,
    has_undo: bool,

    /// Peek cache: token plus the cursor state after lexing it.
    peek: Snapshot,
    peek_token: String,
    peek_available: bool,

    /// Independent checkpoint for the nesting depth alone.
    saved_nest: u32,

    /// Most recent token returned by `get_token` (feeds `unget_token`).
    last_token: String,

    /// Active macro expansions, innermost first. Membership by macro
    /// identity is the recursion guard.
    expanded: VecDeque<ExpandedMacro>,

    /// Doc comment text collected since the previous token.
    pending_doc: String,

    ready: bool,
}

impl<'t> Tokenizer<'t> {
    /// Create a tokenizer bound to `table`. Not ready until one of the
    /// `init` functions succeeds.
    #[must_use]
    pub fn new(table: &'t dyn MacroTable) -> Self {
        Self {
            options: TokenizerOptions::default(),
            state: TokenizerState::default(),
            table,
            filename: String::new(),
            buffer: TextBuffer::new(),
            pos: 0,
            line: 1,
            nest: 0,
            undo: Snapshot::default(),
            has_undo: false,
            peek: Snapshot::default(),
            peek_token: String::new(),
            peek_available: false,
            saved_nest: 0,
            last_token: String::new(),
            expanded: VecDeque::new(),
            pending_doc: String::new(),
            ready: false,
        }
    }

    /// Load `path` through `loader` and bind the buffer to its content.
    ///
    /// On error the tokenizer stays not-ready and every token operation
    /// is a no-op returning an empty result.
    pub fn init(&mut self, path: &Path, loader: &dyn ContentLoader) -> Result<(), InitError> {
        match loader.load(path) {
            Ok(text) if text.is_empty() => {
                self.ready = false;
                Err(InitError::Empty(path.display().to_string()))
            }
            Ok(text) => {
                self.base_init(TextBuffer::from_string(text), path.display().to_string(), 1);
                Ok(())
            }
            Err(err) => {
                self.ready = false;
                Err(err)
            }
        }
    }

    /// Bind the buffer to in-memory text.
    ///
    /// `initial_line` seeds the line counter so sub-buffer parses (e.g. a
    /// function body handed over by the parser) report correct lines.
    pub fn init_from_buffer(&mut self, text: &str, filename: &str, initial_line: u32) {
        self.base_init(TextBuffer::from_str(text), filename.to_string(), initial_line.max(1));
    }

    fn base_init(&mut self, buffer: TextBuffer, filename: String, line: u32) {
        self.buffer = buffer;
        self.filename = filename;
        self.pos = 0;
        self.line = line;
        self.nest = 0;
        self.undo = Snapshot::default();
        self.has_undo = false;
        self.peek_available = false;
        self.peek_token.clear();
        self.last_token.clear();
        self.expanded.clear();
        self.pending_doc.clear();
        self.saved_nest = 0;
        self.ready = true;
    }

    // ─── Configuration & accessors ───────────────────────────────────

    /// `true` once a buffer is bound and token operations are valid.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Name of the input bound at init time.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 1-based line number of the cursor.
    #[must_use]
    pub fn line_number(&self) -> u32 {
        self.line
    }

    /// Current brace nesting depth.
    #[must_use]
    pub fn nesting_level(&self) -> u32 {
        self.nest
    }

    /// Has the cursor consumed the whole buffer?
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.buffer.len()
    }

    /// Active skip-state flags.
    #[must_use]
    pub fn state(&self) -> TokenizerState {
        self.state
    }

    /// Select which constructs are skipped wholesale between tokens.
    pub fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// `true` when the full unwanted-construct skipping preset is active.
    #[must_use]
    pub fn is_skipping_unwanted_tokens(&self) -> bool {
        self.state == TokenizerState::skip_unwanted()
    }

    /// Replace the behavioral options.
    pub fn set_options(&mut self, options: TokenizerOptions) {
        self.options = options;
    }

    /// Buffer content of `[start, end)`, for diagnostics and tests.
    #[must_use]
    pub fn buffer_text(&self, start: usize, end: usize) -> String {
        self.buffer.text(start, end).into_owned()
    }

    /// Full buffer content.
    #[must_use]
    pub fn buffer_content(&self) -> String {
        self.buffer.text(0, self.buffer.len()).into_owned()
    }

    // ─── Token protocol ──────────────────────────────────────────────

    /// Consume and return the next token. Empty at end-of-buffer
    /// (idempotent: further calls keep returning empty).
    pub fn get_token(&mut self) -> String {
        if !self.ready {
            return String::new();
        }
        self.undo = self.snapshot();
        self.has_undo = true;

        let token = if self.peek_available {
            self.restore(self.peek);
            std::mem::take(&mut self.peek_token)
        } else {
            self.do_get_token()
        };
        self.peek_available = false;
        self.last_token.clone_from(&token);
        token
    }

    /// Look ahead one token without consuming it.
    ///
    /// The peeked token is cached: the next `get_token` reuses it without
    /// re-lexing, and repeated peeks return the same token without
    /// advancing any state.
    pub fn peek_token(&mut self) -> String {
        if !self.ready {
            return String::new();
        }
        if !self.peek_available {
            let saved = self.snapshot();
            self.peek_token = self.do_get_token();
            self.peek = self.snapshot();
            self.restore(saved);
            self.peek_available = true;
        }
        self.peek_token.clone()
    }

    /// Roll back the most recent `get_token`, exactly once.
    ///
    /// The ungotten token becomes the cached peek, so the next
    /// `get_token` returns it again without re-lexing. A call with no
    /// prior `get_token` leaves all state unchanged.
    pub fn unget_token(&mut self) {
        if !self.ready || !self.has_undo {
            return;
        }
        self.peek = self.snapshot();
        self.peek_token.clone_from(&self.last_token);
        self.peek_available = true;
        self.restore(self.undo);
        self.has_undo = false;
    }

    /// Checkpoint the brace nesting depth alone.
    ///
    /// Used when a caller parses a sub-region (e.g. a function body)
    /// whose brace bookkeeping must not leak into the enclosing count.
    pub fn save_nesting_level(&mut self) {
        self.saved_nest = self.nest;
    }

    /// Restore the depth captured by [`save_nesting_level`](Self::save_nesting_level).
    pub fn restore_nesting_level(&mut self) {
        self.nest = self.saved_nest;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            line: self.line,
            nest: self.nest,
        }
    }

    fn restore(&mut self, snap: Snapshot) {
        self.pos = snap.pos;
        self.line = snap.line;
        self.nest = snap.nest;
    }

    // ─── Character cursor ────────────────────────────────────────────

    /// Byte at the cursor, or `0x00` past the end.
    #[inline]
    fn current_char(&self) -> u8 {
        self.buffer.byte_at(self.pos)
    }

    /// One-ahead peek.
    #[inline]
    fn next_char(&self) -> u8 {
        self.buffer.byte_at(self.pos + 1)
    }

    /// One-behind peek, `0x00` at the start of the buffer.
    #[inline]
    fn previous_char(&self) -> u8 {
        if self.pos == 0 {
            0
        } else {
            self.buffer.byte_at(self.pos - 1)
        }
    }

    /// Return the current byte and move the cursor forward by one,
    /// counting newlines. At end-of-buffer: returns the sentinel and
    /// does not move.
    #[inline]
    fn advance(&mut self) -> u8 {
        let c = self.current_char();
        if self.pos < self.buffer.len() {
            if c == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        c
    }

    // ─── Extraction ──────────────────────────────────────────────────

    /// Skip → lex → macro-check loop producing one final token.
    fn do_get_token(&mut self) -> String {
        loop {
            if !self.skip_unwanted() {
                return String::new();
            }
            self.pop_expired_expansions();

            let lexeme_start = self.pos;
            let Some((lexeme, identifier_shaped)) = self.lex() else {
                return String::new();
            };

            if identifier_shaped && self.check_macro_usage_and_replace(&lexeme, lexeme_start) {
                // Buffer rewritten in place; restart extraction from the
                // start of the expanded text.
                continue;
            }

            match lexeme.as_str() {
                "{" => self.nest += 1,
                "}" => self.nest = self.nest.saturating_sub(1),
                _ => {}
            }

            if identifier_shaped {
                let doc = if self.options.store_documentation && !self.pending_doc.is_empty() {
                    Some(std::mem::take(&mut self.pending_doc))
                } else {
                    None
                };
                self.table.note_token(&lexeme, self.line, doc.as_deref());
            }

            return lexeme;
        }
    }

    /// Drop expansion records whose region the cursor has left.
    fn pop_expired_expansions(&mut self) {
        while let Some(front) = self.expanded.front() {
            if self.pos >= front.end {
                trace!(macro_id = front.id.0, "left expanded region");
                self.expanded.pop_front();
            } else {
                break;
            }
        }
    }

    /// Extract one lexeme at the cursor: a maximal identifier, number,
    /// literal, or operator/punctuation run.
    ///
    /// Returns the lexeme and whether it is identifier-shaped (the only
    /// lexemes that can denote macro usages). `None` at end-of-buffer.
    fn lex(&mut self) -> Option<(String, bool)> {
        if self.is_eof() {
            return None;
        }
        let start = self.pos;
        let c = self.current_char();

        if is_ident_start(c) {
            while !self.is_eof() && is_ident_continue(self.current_char()) {
                self.advance();
            }
            return Some((self.buffer.text(start, self.pos).into_owned(), true));
        }

        if c.is_ascii_digit() {
            self.lex_number();
            return Some((self.buffer.text(start, self.pos).into_owned(), false));
        }

        if c == b'"' || c == b'\'' {
            // The whole literal, quotes included, is one token.
            self.skip_string();
            return Some((self.buffer.text(start, self.pos).into_owned(), false));
        }

        if c == b'<' && self.state.contains(TokenizerState::SINGLE_ANGLE_BRACE) {
            // Template-argument capture: a balanced <...> is one token.
            self.skip_block(b'<');
            return Some((self.buffer.text(start, self.pos).into_owned(), false));
        }

        self.lex_operator();
        Some((self.buffer.text(start, self.pos).into_owned(), false))
    }

    /// Consume a numeric literal: digits, identifier tail (hex, suffixes),
    /// decimal points, and signed exponents.
    fn lex_number(&mut self) {
        while !self.is_eof() {
            let c = self.current_char();
            if is_ident_continue(c) || c == b'.' {
                self.advance();
            } else if (c == b'+' || c == b'-')
                && matches!(self.previous_char(), b'e' | b'E' | b'p' | b'P')
            {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume one operator or punctuation token, longest match first.
    fn lex_operator(&mut self) {
        const THREE: [&[u8; 3]; 4] = [b"...", b"<<=", b">>=", b"->*"];
        const TWO: [&[u8; 2]; 19] = [
            b"::", b"->", b"++", b"--", b"<<", b">>", b"<=", b">=", b"==", b"!=", b"&&", b"||",
            b"+=", b"-=", b"*=", b"/=", b"%=", b"&=", b"|=",
        ];

        let a = self.current_char();
        let b = self.next_char();
        let c = self.buffer.byte_at(self.pos + 2);

        if THREE.iter().any(|op| op[0] == a && op[1] == b && op[2] == c) {
            self.advance();
            self.advance();
            self.advance();
            return;
        }
        if TWO.iter().any(|op| op[0] == a && op[1] == b) {
            self.advance();
            self.advance();
            return;
        }
        self.advance();
    }
}
