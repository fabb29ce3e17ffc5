//! Conditional-preprocessor branch selection.
//!
//! Driven only when `TokenizerOptions::want_preprocessor` is set. The
//! `#if`-family condition is evaluated against the symbol table; when a
//! branch is rejected, the cursor jumps forward to the next sibling
//! branch head, tracking nested `#if...#endif` regions so an inner
//! conditional never prematurely matches an outer `#else`/`#endif`.
//!
//! Malformed or unterminated conditional blocks skip to end-of-buffer
//! rather than failing hard.

use cpptok_core::is_ident_continue;
use tracing::trace;

use crate::condition::{self, SymbolResolver};
use crate::directive::PreprocessorType;
use crate::macro_table::MacroTable;
use crate::tokenizer::Tokenizer;

/// Resolver backing `#if` evaluation with symbol-table lookups.
///
/// An operand that names an object-like macro is textually expanded one
/// level before classification; anything else evaluates to 0, as a real
/// preprocessor treats undefined identifiers.
struct TableResolver<'a> {
    table: &'a dyn MacroTable,
}

impl SymbolResolver for TableResolver<'_> {
    fn is_defined(&self, name: &str) -> bool {
        self.table.lookup(name).is_some()
    }

    fn value_of(&self, name: &str) -> i64 {
        let Some(def) = self.table.lookup(name).and_then(|id| self.table.definition(id)) else {
            return 0;
        };
        if def.function_like {
            return 0;
        }
        condition::parse_number(def.replacement.trim()).unwrap_or(0)
    }
}

impl Tokenizer<'_> {
    /// Act on a classified conditional directive. The cursor sits just
    /// past the directive keyword.
    pub(super) fn handle_conditional(&mut self, directive: PreprocessorType) {
        match directive {
            PreprocessorType::If => {
                let live = self.calc_condition_expression();
                trace!(line = self.line, live, "#if");
                if !live {
                    self.skip_to_next_conditional_branch();
                }
            }
            PreprocessorType::Ifdef => {
                let live = self.is_macro_defined();
                self.skip_to_eol();
                trace!(line = self.line, live, "#ifdef");
                if !live {
                    self.skip_to_next_conditional_branch();
                }
            }
            PreprocessorType::Ifndef => {
                let live = !self.is_macro_defined();
                self.skip_to_eol();
                trace!(line = self.line, live, "#ifndef");
                if !live {
                    self.skip_to_next_conditional_branch();
                }
            }
            // Reaching a sibling branch head while lexing means the
            // taken branch is exhausted: jump past the rest of the block.
            PreprocessorType::Elif
            | PreprocessorType::Elifdef
            | PreprocessorType::Elifndef
            | PreprocessorType::Else => {
                trace!(line = self.line, ?directive, "branch exhausted");
                self.skip_to_matching_endif();
            }
            PreprocessorType::Endif => {
                self.skip_to_eol();
            }
            PreprocessorType::Other => {}
        }
    }

    /// Evaluate the rest of the current line as a `#if`/`#elif`
    /// condition. The cursor ends at the line terminator.
    pub(super) fn calc_condition_expression(&mut self) -> bool {
        let expr = self.read_to_eol(true);
        let resolver = TableResolver { table: self.table };
        condition::evaluate(&expr, &resolver)
    }

    /// Read the identifier operand of `#ifdef`/`#ifndef` and test it
    /// against the symbol table. The rest of the line is left in place.
    pub(super) fn is_macro_defined(&mut self) -> bool {
        self.skip_whitespace();
        let start = self.pos;
        while !self.is_eof() && is_ident_continue(self.current_char()) {
            self.advance();
        }
        let name = self.buffer.text(start, self.pos).into_owned();
        !name.is_empty() && self.table.lookup(&name).is_some()
    }

    /// Scan forward to the next sibling-level branch of the enclosing
    /// conditional: a live `#elif(n)def)`, an `#else`, or the `#endif`.
    ///
    /// `#elif`-family heads are re-evaluated on the way; a true one stops
    /// the scan and lexing resumes inside that branch. Unterminated
    /// blocks consume to end-of-buffer.
    pub(super) fn skip_to_next_conditional_branch(&mut self) {
        let mut depth = 0u32;
        while !self.is_eof() {
            let c = self.current_char();
            match c {
                b'"' | b'\'' => self.skip_string(),
                b'/' if self.next_char() == b'/' || self.next_char() == b'*' => self.skip_comment(),
                b'#' => {
                    let directive = self.classify_directive();
                    if directive.opens_block() {
                        depth += 1;
                        self.skip_to_eol();
                    } else if directive == PreprocessorType::Endif {
                        let done = depth == 0;
                        depth = depth.saturating_sub(1);
                        self.skip_to_eol();
                        if done {
                            return;
                        }
                    } else if depth == 0 && directive.is_branch_head() {
                        let live = match directive {
                            PreprocessorType::Elif => self.calc_condition_expression(),
                            PreprocessorType::Elifdef => self.is_macro_defined(),
                            PreprocessorType::Elifndef => !self.is_macro_defined(),
                            _ => true, // #else
                        };
                        self.skip_to_eol();
                        if live {
                            trace!(line = self.line, ?directive, "taking branch");
                            return;
                        }
                    } else {
                        self.skip_to_eol();
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Jump past all remaining sibling branches to the terminating
    /// `#endif` of the enclosing conditional, respecting nested depth.
    pub(super) fn skip_to_matching_endif(&mut self) {
        let mut depth = 0u32;
        while !self.is_eof() {
            let c = self.current_char();
            match c {
                b'"' | b'\'' => self.skip_string(),
                b'/' if self.next_char() == b'/' || self.next_char() == b'*' => self.skip_comment(),
                b'#' => {
                    let directive = self.classify_directive();
                    if directive.opens_block() {
                        depth += 1;
                    } else if directive == PreprocessorType::Endif {
                        if depth == 0 {
                            self.skip_to_eol();
                            return;
                        }
                        depth -= 1;
                    }
                    self.skip_to_eol();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}
