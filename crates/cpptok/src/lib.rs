//! Lexical analyzer for C/C++-family source text with best-effort macro
//! expansion and conditional-preprocessor evaluation.
//!
//! The tokenizer produces a stream of token strings for a downstream
//! symbol-indexing parser. It behaves like a compiler front-end's
//! preprocessor+lexer stage without being a full preprocessor: it tracks
//! brace/bracket nesting, textually expands macro usages in place
//! (including function-like macros with arguments), breaks infinite
//! recursive expansion, and evaluates `#if`/`#ifdef`-style conditionals
//! well enough to decide which text region to keep.
//!
//! Out of scope by design: ISO token pasting (`##`), stringizing (`#`),
//! `#include` processing, and any typed AST — the output is a flat
//! sequence of token strings plus line/nesting metadata.
//!
//! # Example
//!
//! ```
//! use cpptok::{InMemoryMacroTable, MacroDef, Tokenizer};
//!
//! let mut table = InMemoryMacroTable::new();
//! table.define(MacroDef::object_like("AAA", "BBBB"));
//!
//! let mut tokenizer = Tokenizer::new(&table);
//! tokenizer.init_from_buffer("int AAA ;", "mem", 1);
//!
//! assert_eq!(tokenizer.get_token(), "int");
//! assert_eq!(tokenizer.get_token(), "BBBB");
//! assert_eq!(tokenizer.get_token(), ";");
//! assert_eq!(tokenizer.get_token(), ""); // exhausted
//! ```
//!
//! # Concurrency
//!
//! A tokenizer owns its buffer exclusively; one instance per input, no
//! internal locking. Multiple instances may run on separate threads as
//! long as the shared [`MacroTable`] is immutable (or internally
//! synchronized) during the session.

mod condition;
mod directive;
mod loader;
mod macro_table;
mod options;
mod tokenizer;

pub use condition::{evaluate as evaluate_condition, SymbolResolver};
pub use directive::PreprocessorType;
pub use loader::{ContentLoader, FileLoader, InitError};
pub use macro_table::{EmptyMacroTable, InMemoryMacroTable, MacroDef, MacroId, MacroTable};
pub use options::{TokenizerOptions, TokenizerState};
pub use tokenizer::Tokenizer;
