//! The skipper: whitespace, comments, literals, balanced blocks, and
//! unwanted-construct skipping, plus the directive-body readers.
//!
//! Recovery is permissive throughout: unterminated comments, literals,
//! and blocks consume to end-of-buffer without signaling an error. The
//! resulting token stream may be truncated, but the pass always
//! terminates.

use cpptok_core::is_ident_continue;

use crate::directive::PreprocessorType;
use crate::options::TokenizerState;
use crate::tokenizer::Tokenizer;

impl Tokenizer<'_> {
    /// Skip everything the caller does not want to see before the next
    /// token: whitespace, newlines, comments, conditional-preprocessor
    /// regions, and the constructs selected by the active state flags.
    ///
    /// Returns `false` when the buffer is exhausted.
    pub(super) fn skip_unwanted(&mut self) -> bool {
        loop {
            if self.is_eof() {
                return false;
            }
            let c = self.current_char();

            if c == b' ' || c == b'\t' {
                self.skip_whitespace();
                continue;
            }
            if c == b'\n' || c == b'\r' {
                self.advance();
                continue;
            }
            if c == b'/' && (self.next_char() == b'/' || self.next_char() == b'*') {
                self.skip_comment();
                continue;
            }

            if self.state.contains(TokenizerState::READ_RAW_EXPRESSION) {
                // Raw capture: everything else reaches the caller.
                return true;
            }

            if c == b'#' && self.options.want_preprocessor {
                let saved = self.snapshot();
                let directive = self.classify_directive();
                if directive == PreprocessorType::Other {
                    // #include, #define, ... are the downstream parser's
                    // business: rewind and emit `#` as a token.
                    self.restore(saved);
                    return true;
                }
                self.handle_conditional(directive);
                continue;
            }

            if c == b'=' && self.next_char() != b'=' && self.state.contains(TokenizerState::SKIP_EQUAL)
            {
                self.advance();
                self.skip_to_one_of(b",;)}");
                continue;
            }
            if c == b'?' && self.state.contains(TokenizerState::SKIP_QUESTION) {
                self.advance();
                self.skip_to_one_of(b";}");
                continue;
            }
            if c == b'[' && self.state.contains(TokenizerState::SKIP_SUBSCRIPT) {
                self.skip_block(b'[');
                continue;
            }

            return true;
        }
    }

    /// Advance over space and tab characters only (newlines are consumed
    /// by the skip-unwanted driver so line counting stays in one place).
    pub(super) fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), b' ' | b'\t') && !self.is_eof() {
            self.advance();
        }
    }

    /// Skip a `//` or `/* */` comment. The cursor must be at the leading
    /// `/` with a comment-forming character behind it.
    ///
    /// For a line comment the cursor stops AT the terminating newline
    /// (not past it), preserving line-counting symmetry. For a block
    /// comment the cursor stops just after the closing `*/`; an
    /// unterminated block consumes to end-of-buffer.
    pub(super) fn skip_comment(&mut self) {
        let block = self.next_char() == b'*';
        self.advance(); // '/'
        self.advance(); // '/' or '*'

        let marker = self.current_char();
        let is_doc = marker == b'!' || marker == (if block { b'*' } else { b'/' });
        // In "/**/" the second '*' belongs to the terminator, not a marker.
        let closes_now = block && marker == b'*' && self.next_char() == b'/';
        let capture = self.options.store_documentation && is_doc && !closes_now;
        let body_start = if capture {
            self.advance();
            // skip a trailing-style '<' marker ("///<", "/**<")
            if self.current_char() == b'<' {
                self.advance();
            }
            self.pos
        } else {
            self.pos
        };

        if block {
            let end;
            loop {
                if self.is_eof() {
                    end = self.pos;
                    break;
                }
                if self.current_char() == b'*' && self.next_char() == b'/' {
                    end = self.pos;
                    self.advance();
                    self.advance();
                    break;
                }
                self.advance();
            }
            if capture {
                let text = self.buffer.text(body_start, end).trim().to_string();
                self.append_doc(&text);
            }
        } else {
            self.skip_to_eol();
            if capture {
                let text = self.buffer.text(body_start, self.pos).trim().to_string();
                self.append_doc(&text);
            }
        }
    }

    fn append_doc(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.pending_doc.is_empty() {
            self.pending_doc.push('\n');
        }
        self.pending_doc.push_str(text);
    }

    /// Skip a string or character literal, cursor at the opening quote.
    /// Stops just past the matching unescaped closing quote, or at
    /// end-of-buffer for an unterminated literal.
    pub(super) fn skip_string(&mut self) {
        let quote = self.current_char();
        if quote != b'"' && quote != b'\'' {
            return;
        }
        if self.skip_to_string_end(quote) {
            self.advance(); // closing quote
        }
    }

    /// Move to the closing `quote`, honoring `\` escapes and
    /// backslash-newline continuations. The cursor ends AT the closing
    /// quote. Returns `false` if the buffer ran out first.
    pub(super) fn skip_to_string_end(&mut self, quote: u8) -> bool {
        self.advance(); // opening quote
        while !self.is_eof() {
            let c = self.current_char();
            if c == quote && !self.is_escaped_char() {
                return true;
            }
            self.advance();
        }
        false
    }

    /// Is the byte at the cursor escaped by an odd run of backslashes?
    fn is_escaped_char(&self) -> bool {
        let mut backslashes = 0usize;
        let mut i = self.pos;
        while i > 0 && self.buffer.byte_at(i - 1) == b'\\' {
            backslashes += 1;
            i -= 1;
        }
        backslashes % 2 == 1
    }

    /// Check that the `\n` at the cursor is an escaped line end: the
    /// character immediately preceding, skipping a possible `\r`, is `\`.
    /// Recognizes both DOS (`\\\r\n`) and Unix (`\\\n`) styles.
    pub(super) fn is_backslash_before_eol(&self) -> bool {
        let prev = self.previous_char();
        if prev == b'\r' && self.pos >= 2 {
            return self.buffer.byte_at(self.pos - 2) == b'\\';
        }
        prev == b'\\'
    }

    /// Advance the cursor to the terminating `\n` of the current line
    /// (not past it), honoring backslash-newline continuations. Stops at
    /// end-of-buffer for the last line.
    pub fn skip_to_eol(&mut self) {
        while let Some(nl) = self.buffer.find_newline(self.pos) {
            self.pos = nl;
            if self.is_backslash_before_eol() {
                self.advance();
            } else {
                return;
            }
        }
        self.pos = self.buffer.len();
    }

    /// Skip a balanced block opened by `open` (`<`, `(`, `[`, or `{`),
    /// honoring arbitrary nesting of the same bracket kind plus string
    /// literals and comments inside. Cursor must be at `open`; it ends
    /// just past the matching close, or at end-of-buffer.
    pub(super) fn skip_block(&mut self, open: u8) {
        let close = match open {
            b'(' => b')',
            b'[' => b']',
            b'{' => b'}',
            b'<' => b'>',
            _ => return,
        };
        if self.current_char() != open {
            return;
        }
        self.advance();
        let mut depth = 1u32;
        while !self.is_eof() {
            let c = self.current_char();
            if c == open {
                depth += 1;
                self.advance();
            } else if c == close {
                depth -= 1;
                self.advance();
                if depth == 0 {
                    return;
                }
            } else if c == b'"' || c == b'\'' {
                self.skip_string();
            } else if c == b'/' && (self.next_char() == b'/' || self.next_char() == b'*') {
                self.skip_comment();
            } else {
                self.advance();
            }
        }
    }

    /// Skip forward until one of `delimiters` appears at the current
    /// nesting level; nested blocks, literals, and comments are skipped
    /// whole. The cursor stops AT the delimiter (not past it). Returns
    /// `false` if the buffer ran out first.
    pub(super) fn skip_to_one_of(&mut self, delimiters: &[u8]) -> bool {
        while !self.is_eof() {
            let c = self.current_char();
            if delimiters.contains(&c) {
                return true;
            }
            match c {
                b'"' | b'\'' => self.skip_string(),
                b'(' | b'[' | b'{' => self.skip_block(c),
                b'<' if self.state.contains(TokenizerState::SINGLE_ANGLE_BRACE) => {
                    self.skip_block(b'<');
                }
                b'/' if self.next_char() == b'/' || self.next_char() == b'*' => {
                    self.skip_comment();
                }
                _ => {
                    self.advance();
                }
            }
        }
        false
    }

    /// Read from the cursor to (but not including) the line terminator,
    /// splicing backslash-newline continuations.
    ///
    /// With `strip_redundant`, run-length space/tab sequences collapse to
    /// a single space and comments are removed from the returned text —
    /// the shape wanted for capturing `#define` bodies.
    pub fn read_to_eol(&mut self, strip_redundant: bool) -> String {
        let mut out: Vec<u8> = Vec::new();
        while !self.is_eof() {
            let c = self.current_char();
            if c == b'\n' {
                if self.is_backslash_before_eol() {
                    // Drop the continuation backslash (and a DOS '\r')
                    // already accumulated, then join the lines.
                    if out.last() == Some(&b'\r') {
                        out.pop();
                    }
                    if out.last() == Some(&b'\\') {
                        out.pop();
                    }
                    self.advance();
                    continue;
                }
                break;
            }
            if strip_redundant {
                if c == b'/' && self.next_char() == b'/' {
                    // Rest of the line is comment; leave the cursor at EOL.
                    while !self.is_eof() && self.current_char() != b'\n' {
                        self.advance();
                    }
                    continue;
                }
                if c == b'/' && self.next_char() == b'*' {
                    self.skip_comment();
                    if out.last().is_some_and(|&b| b != b' ') {
                        out.push(b' ');
                    }
                    continue;
                }
                if c == b' ' || c == b'\t' {
                    self.skip_whitespace();
                    if out.last().is_some_and(|&b| b != b' ') {
                        out.push(b' ');
                    }
                    continue;
                }
                if c == b'\r' {
                    self.advance();
                    continue;
                }
            }
            out.push(self.advance());
        }
        if strip_redundant {
            while out.last() == Some(&b' ') {
                out.pop();
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Read the region between a balanced `(` and its matching `)`,
    /// tolerating nested parentheses, and return the inner text.
    ///
    /// Leading whitespace (including newlines and comments) before the
    /// `(` is skipped. Returns `None` if the next non-whitespace
    /// character is not `(`, or if the buffer ends before the match.
    pub fn read_parenthesized_region(&mut self) -> Option<String> {
        loop {
            if self.is_eof() {
                return None;
            }
            match self.current_char() {
                b' ' | b'\t' => self.skip_whitespace(),
                b'\n' | b'\r' => {
                    self.advance();
                }
                b'/' if self.next_char() == b'/' || self.next_char() == b'*' => {
                    self.skip_comment();
                }
                b'(' => break,
                _ => return None,
            }
        }
        self.advance(); // '('
        let start = self.pos;
        let mut depth = 1u32;
        while !self.is_eof() {
            match self.current_char() {
                b'(' => {
                    depth += 1;
                    self.advance();
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = self.buffer.text(start, self.pos).into_owned();
                        self.advance();
                        return Some(inner);
                    }
                    self.advance();
                }
                b'"' | b'\'' => self.skip_string(),
                b'/' if self.next_char() == b'/' || self.next_char() == b'*' => self.skip_comment(),
                _ => {
                    self.advance();
                }
            }
        }
        None
    }

    /// Read the directive keyword after a `#` and classify it. Consumes
    /// the `#`, intervening whitespace, and the keyword.
    pub(super) fn classify_directive(&mut self) -> PreprocessorType {
        self.advance(); // '#'
        self.skip_whitespace();
        let start = self.pos;
        while !self.is_eof() && is_ident_continue(self.current_char()) {
            self.advance();
        }
        let keyword = self.buffer.text(start, self.pos).into_owned();
        PreprocessorType::from_keyword(&keyword)
    }
}
